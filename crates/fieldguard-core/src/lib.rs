#![deny(missing_docs)]

//! # fieldguard-core: Request-Field Validation
//!
//! Framework-agnostic core of fieldguard. It knows nothing about HTTP types;
//! request sections arrive as `serde_json` maps and leave as a map of
//! field errors. The Axum adapter lives in `fieldguard-axum`.
//!
//! ## Building Blocks
//!
//! - [`Validator`]: `(value, field) -> Option<message>`. Pure and total:
//!   a value of the wrong runtime type is a failure message, never a panic.
//! - [`Transformer`]: `value -> value` normalization, run before any
//!   validator of the same field.
//! - [`AsyncValidator`]: validators that must await something (a lookup).
//!   They only run for fields that passed every synchronous validator.
//! - [`Schema`]: ordered field name to [`FieldRules`] mapping.
//! - [`RequestValidator`]: one schema bound to a [`DataSource`], or a set of
//!   route templates each with its own schema and source.
//!
//! ## Example
//!
//! ```
//! use fieldguard_core::validators::{is_number, is_required};
//! use fieldguard_core::{RequestData, RequestValidator, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .field("name", is_required())
//!     .field("age", is_number());
//! let validator = RequestValidator::new(schema);
//!
//! let request = RequestData::new("/users").with_body(json!({}));
//! let outcome = validator.validate(&request);
//! let errors = outcome.errors().unwrap();
//! assert_eq!(errors.get("name"), Some("name is required"));
//! assert_eq!(errors.get("age"), Some("age must be a number"));
//! ```

pub mod async_validator;
pub mod config;
pub mod error;
pub mod request;
pub mod schema;
pub mod source;
pub mod spec;
pub mod template;
pub mod transform;
pub mod validator;
pub mod validators;

pub use async_validator::{is_email_unique, AsyncValidator, EmailLookup, UniqueEmail};
pub use config::{RouteConfig, ValidationConfig};
pub use error::ConfigError;
pub use request::{
    Entry, Outcome, RequestValidator, RoutesBuilder, Selection, ValidationOptions,
    DEFAULT_BODY_LIMIT,
};
pub use schema::{Evaluation, FieldRules, Schema, ValidationErrors};
pub use source::{DataSource, RequestData};
pub use spec::{compile_schema, FieldSpec, RuleSpec};
pub use template::PathTemplate;
pub use transform::{capitalize_string, trim_string, Transformer};
pub use validator::Validator;
