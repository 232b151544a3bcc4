//! # Demo Application
//!
//! A small user service used by the `fieldguard-demo` binary and the
//! integration tests. Routes:
//!
//! | Method | Path | Validated |
//! |--------|------|-----------|
//! | `POST` | `/users` | body: name, email (unique), age, tags, address |
//! | `GET`  | `/users/{id}` | params: id is a MongoDB ID |
//! | `GET`  | `/search` | query: q is required |
//! | `GET`  | `/openapi.json` | not validated |

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use fieldguard_core::validators::{
    array_elements, array_max_length, is_country_code, is_email, is_integer, is_length,
    is_mongo_id, is_number, is_required, is_string, min_value, object_keys,
};
use fieldguard_core::{
    capitalize_string, is_email_unique, trim_string, DataSource, FieldRules, RequestValidator,
    Schema,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::{with_validation, PathParams, ValidatedData};
use crate::openapi;

/// Addresses the demo treats as already registered.
pub const REGISTERED_EMAILS: [&str; 2] = ["taken@example.com", "admin@example.com"];

/// The validator used when no configuration file is given.
pub fn default_validator() -> Result<RequestValidator, fieldguard_core::ConfigError> {
    let user = Schema::new()
        .field(
            "name",
            FieldRules::new()
                .transform(trim_string())
                .transform(capitalize_string())
                .rule(is_required())
                .rule(is_string())
                .rule(is_length(2, 40)),
        )
        .field(
            "email",
            FieldRules::new()
                .transform(trim_string())
                .rule(is_required())
                .rule(is_email())
                .rule_async(is_email_unique(
                    REGISTERED_EMAILS.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
                )),
        )
        .field("age", [is_number(), is_integer(), min_value(0.0)])
        .field(
            "tags",
            [array_max_length(10), array_elements(vec![is_string()])],
        )
        .field(
            "address",
            object_keys(
                Schema::new()
                    .field("city", [is_required(), is_string()])
                    .field("country", [is_required(), is_country_code()]),
            ),
        );

    RequestValidator::routes()
        .route("/users", user)
        .route_with(
            "/users/{id}",
            DataSource::Params,
            Schema::new().field("id", [is_required(), is_mongo_id()]),
        )
        .route_with(
            "/search",
            DataSource::Query,
            Schema::new().field("q", [is_required(), is_string()]),
        )
        .build()
}

/// Assemble the demo router with `validator` installed.
pub fn app(validator: RequestValidator) -> Router {
    let api = Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(show_user))
        .route("/search", get(search));

    with_validation(api, validator)
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
}

async fn create_user(ValidatedData(user): ValidatedData) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(Value::Object(user)))
}

async fn show_user(params: PathParams) -> Json<Value> {
    Json(json!({ "id": params.get("id") }))
}

async fn search(ValidatedData(query): ValidatedData) -> Json<Value> {
    Json(json!({ "query": query.get("q"), "results": [] }))
}
