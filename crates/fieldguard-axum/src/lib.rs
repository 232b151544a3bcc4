//! # fieldguard-axum: Axum Validation Middleware
//!
//! Mounts a [`fieldguard_core::RequestValidator`] in front of Axum
//! handlers. Requests that fail validation are answered with
//! `400 {"errors": {...}}` and never reach the handler; requests that pass
//! carry the normalized data as a [`ValidatedData`] extension.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → Extension(RequestValidator) → validate_request → Handler
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use axum::routing::post;
//! use axum::Router;
//! use fieldguard_axum::{with_validation, ValidatedData};
//! use fieldguard_core::validators::{is_number, is_required};
//! use fieldguard_core::{RequestValidator, Schema};
//!
//! async fn create(ValidatedData(user): ValidatedData) -> String {
//!     format!("created {}", user["name"])
//! }
//!
//! let schema = Schema::new()
//!     .field("name", is_required())
//!     .field("age", is_number());
//! let app: Router = with_validation(
//!     Router::new().route("/users", post(create)),
//!     RequestValidator::new(schema),
//! );
//! ```

pub mod demo;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod openapi;

pub use error::{ErrorBody, Rejection};
pub use middleware::{validate_request, with_validation, PathParams, ValidatedData};
