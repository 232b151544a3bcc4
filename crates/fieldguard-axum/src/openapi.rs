//! # OpenAPI Components
//!
//! Publishes the rejection body schema so services that mount the
//! middleware can reference it from their own OpenAPI documents. Served at
//! `/openapi.json` by the demo server.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ErrorBody;

/// OpenAPI document describing the middleware's responses.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "fieldguard",
        description = "Request-field validation middleware. Rejected requests receive a 400 (or 413) response with an ErrorBody."
    ),
    components(schemas(ErrorBody))
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document at `/openapi.json`.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.schemas.contains_key("ErrorBody"));
    }
}
