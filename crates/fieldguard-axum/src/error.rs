//! # Rejections
//!
//! Every response the middleware writes itself is a [`Rejection`]. All of
//! them share one JSON shape, [`ErrorBody`], a flat map from the offending
//! field (or request section) to a message:
//!
//! ```json
//! { "errors": { "name": "name is required" } }
//! ```
//!
//! | Variant | Status | Key |
//! |---------|--------|-----|
//! | `Fields` | 400 | each failing field |
//! | `MalformedBody`, `UnreadableBody` | 400 | `body` |
//! | `MalformedQuery` | 400 | `query` |
//! | `BodyTooLarge` | 413 | `body` |
//! | `Configuration` | 400 | `target` |
//! | `NotValidated` | 500 | `request` |

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fieldguard_core::{ConfigError, ValidationErrors};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON body of every rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Field or section name to message.
    pub errors: BTreeMap<String, String>,
}

impl ErrorBody {
    fn single(key: &str, message: &str) -> Self {
        Self {
            errors: BTreeMap::from([(key.to_string(), message.to_string())]),
        }
    }
}

/// Why the middleware answered a request itself.
#[derive(Error, Debug)]
pub enum Rejection {
    /// One or more fields failed validation (400).
    #[error("{} field(s) failed validation", .0.len())]
    Fields(ValidationErrors),

    /// The body was not valid JSON (400).
    #[error("body must be valid JSON: {0}")]
    MalformedBody(String),

    /// The body could not be read from the connection (400).
    #[error("body could not be read: {0}")]
    UnreadableBody(String),

    /// The query string could not be decoded (400).
    #[error("query string is not valid URL-encoded data: {0}")]
    MalformedQuery(String),

    /// The body is larger than the configured limit (413).
    #[error("body exceeds the limit of {limit} bytes")]
    BodyTooLarge {
        /// The limit in bytes.
        limit: usize,
    },

    /// The validator was configured wrongly (400).
    #[error("invalid validator configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// A handler asked for validation output on a route that was not
    /// validated (500).
    #[error("request was not validated")]
    NotValidated,
}

impl Rejection {
    /// HTTP status for this rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Fields(_)
            | Self::MalformedBody(_)
            | Self::UnreadableBody(_)
            | Self::MalformedQuery(_)
            | Self::Configuration(_) => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotValidated => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this rejection.
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::Fields(errors) => ErrorBody {
                errors: errors.clone().into_map(),
            },
            Self::MalformedBody(_) => ErrorBody::single("body", "body must be valid JSON"),
            Self::UnreadableBody(_) => ErrorBody::single("body", "body could not be read"),
            Self::MalformedQuery(_) => {
                ErrorBody::single("query", "query string must be valid URL-encoded data")
            }
            Self::BodyTooLarge { .. } => {
                ErrorBody::single("body", "body exceeds the configured size limit")
            }
            Self::Configuration(_) => ErrorBody::single("target", "Invalid target specified"),
            Self::NotValidated => ErrorBody::single("request", "request was not validated"),
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match &self {
            Self::Configuration(_) | Self::NotValidated => {
                tracing::error!(error = %self, "validation middleware misconfigured")
            }
            Self::Fields(_) => {}
            _ => tracing::debug!(error = %self, "request rejected before validation"),
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn response_parts(rejection: Rejection) -> (StatusCode, ErrorBody) {
        let response = rejection.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn fields_render_error_map() {
        let errors: ValidationErrors = [
            ("name".to_string(), "name is required".to_string()),
            ("age".to_string(), "age must be a number".to_string()),
        ]
        .into_iter()
        .collect();
        let (status, body) = response_parts(Rejection::Fields(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.errors["name"], "name is required");
        assert_eq!(body.errors["age"], "age must be a number");
        assert_eq!(body.errors.len(), 2);
    }

    #[tokio::test]
    async fn malformed_body_hides_parser_detail() {
        let (status, body) =
            response_parts(Rejection::MalformedBody("EOF at line 1".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, ErrorBody::single("body", "body must be valid JSON"));
    }

    #[tokio::test]
    async fn body_too_large_is_413() {
        let (status, body) = response_parts(Rejection::BodyTooLarge { limit: 8 }).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body.errors["body"], "body exceeds the configured size limit");
    }

    #[tokio::test]
    async fn configuration_error_keeps_legacy_body() {
        let err = ConfigError::UnknownSource("cookies".into());
        let (status, body) = response_parts(Rejection::from(err)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, ErrorBody::single("target", "Invalid target specified"));
    }

    #[test]
    fn display_messages() {
        assert!(Rejection::BodyTooLarge { limit: 8 }.to_string().contains('8'));
        assert_eq!(Rejection::NotValidated.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            Rejection::MalformedQuery("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn error_body_serializes_flat() {
        let json = serde_json::to_value(ErrorBody::single("id", "id is required")).unwrap();
        assert_eq!(json, serde_json::json!({"errors": {"id": "id is required"}}));
    }
}
