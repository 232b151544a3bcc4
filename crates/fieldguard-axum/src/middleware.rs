//! # Validation Middleware
//!
//! [`validate_request`] is an `axum::middleware::from_fn` middleware. It
//! reads the [`RequestValidator`] from the request extensions, so the
//! validator is installed the same way as any other layer configuration:
//!
//! ```ignore
//! Router::new()
//!     .route("/users/{id}", get(show_user))
//!     .layer(from_fn(validate_request))
//!     .layer(Extension(validator));
//! ```
//!
//! ## Flow
//!
//! 1. Select the schema for the request path. No match → continue.
//! 2. Extract the sections the source needs (see [`crate::extract`]).
//! 3. Evaluate, awaiting asynchronous validators.
//! 4. Invalid → 400 with the error map; the handler never runs.
//! 5. Valid → insert [`ValidatedData`] and [`PathParams`], then continue.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Router};
use fieldguard_core::{Outcome, RequestValidator};
use serde_json::{Map, Value};

use crate::error::Rejection;
use crate::extract;

// ── Extensions ──────────────────────────────────────────────────────────────

/// The validated lookup object, after transformers ran.
///
/// Inserted by [`validate_request`] on success; handlers extract it like any
/// other extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedData(pub Map<String, Value>);

impl ValidatedData {
    /// Value of `field`, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Take the map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ValidatedData {
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ValidatedData>()
            .cloned()
            .ok_or(Rejection::NotValidated)
    }
}

/// Path parameters of the validated request.
///
/// Holds the route template's captures, plus the host router's parameters
/// when the source reads them (`params` or `merged`). Captures win on a
/// name collision. Values are percent-decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathParams(pub Map<String, Value>);

impl PathParams {
    /// The captured segment for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PathParams {
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<PathParams>()
            .cloned()
            .ok_or(Rejection::NotValidated)
    }
}

// ── Middleware ──────────────────────────────────────────────────────────────

/// Validate the request against the [`RequestValidator`] in its extensions.
///
/// Without a validator extension the request passes through unvalidated.
pub async fn validate_request(request: Request, next: Next) -> Response {
    let Some(validator) = request.extensions().get::<RequestValidator>().cloned() else {
        tracing::warn!("no RequestValidator extension installed; skipping validation");
        return next.run(request).await;
    };

    match check(&validator, request).await {
        Ok(request) => next.run(request).await,
        Err(rejection) => rejection.into_response(),
    }
}

async fn check(validator: &RequestValidator, request: Request) -> Result<Request, Rejection> {
    let path = request.uri().path().to_string();

    let Some(selection) = validator.select(&path) else {
        tracing::debug!(%path, "no route template matched; not validated");
        metrics::counter!("fieldguard_requests_total", "outcome" => "unmatched").increment(1);
        return Ok(request);
    };

    let (mut request, data) =
        match extract::request_data(request, selection.source(), validator.body_limit()).await {
            Ok(extracted) => extracted,
            Err(rejection) => {
                metrics::counter!("fieldguard_requests_total", "outcome" => "malformed")
                    .increment(1);
                return Err(rejection);
            }
        };

    let outcome = selection.evaluate_async(&data).await;
    let extracted_params = data.params;

    match outcome {
        Outcome::Valid { route, data } => {
            tracing::debug!(%path, route = route.as_deref().unwrap_or("*"), "request validated");
            metrics::counter!("fieldguard_requests_total", "outcome" => "valid").increment(1);
            let mut params = extracted_params;
            params.extend(selection.params().clone());
            request.extensions_mut().insert(ValidatedData(data));
            request.extensions_mut().insert(PathParams(params));
            Ok(request)
        }
        Outcome::Invalid { route, errors } => {
            tracing::info!(
                %path,
                route = route.as_deref().unwrap_or("*"),
                source = %selection.source(),
                errors = errors.len(),
                "request rejected"
            );
            metrics::counter!("fieldguard_requests_total", "outcome" => "rejected").increment(1);
            Err(Rejection::Fields(errors))
        }
        Outcome::Unmatched => Ok(request),
    }
}

/// Install `validator` on every route of `router`.
pub fn with_validation<S>(router: Router<S>, validator: RequestValidator) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(from_fn(validate_request))
        .layer(Extension(validator))
}
