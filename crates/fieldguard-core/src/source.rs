//! # Data Sources
//!
//! A request carries three parsed sections: path parameters, the query
//! string, and the body. A [`DataSource`] names the section (or the merge of
//! all three) that a schema is evaluated against.
//!
//! ## Merge precedence
//!
//! `merged` overlays the sections in a fixed order, later sections
//! overwriting earlier ones on key collision:
//!
//! ```text
//! params  <  body  <  query
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Which request section supplies values to a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// The parsed JSON body. The default.
    #[default]
    Body,
    /// The URL query string.
    Query,
    /// Path parameters.
    Params,
    /// params, then body, then query, later keys overwriting earlier ones.
    Merged,
}

impl DataSource {
    /// The configuration name of this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Query => "query",
            Self::Params => "params",
            Self::Merged => "merged",
        }
    }

    /// Whether evaluating this source requires the request body.
    pub fn needs_body(&self) -> bool {
        matches!(self, Self::Body | Self::Merged)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "body" => Ok(Self::Body),
            "query" => Ok(Self::Query),
            "params" => Ok(Self::Params),
            "merged" => Ok(Self::Merged),
            other => Err(ConfigError::UnknownSource(other.to_string())),
        }
    }
}

/// Framework-neutral view of one request.
///
/// Adapters fill this from their own request type; the validator never
/// looks at anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestData {
    /// The request path, without query string.
    pub path: String,
    /// Path parameters.
    pub params: Map<String, Value>,
    /// Query string parameters.
    pub query: Map<String, Value>,
    /// The parsed body. `Value::Null` when there is none.
    pub body: Value,
}

impl RequestData {
    /// A request for `path` with empty sections.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Replace the path parameters.
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Replace the query parameters.
    pub fn with_query(mut self, query: Map<String, Value>) -> Self {
        self.query = query;
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// The lookup object `source` selects.
    ///
    /// A body that is not a JSON object contributes no keys.
    pub fn target(&self, source: DataSource) -> Map<String, Value> {
        match source {
            DataSource::Body => self.body_object(),
            DataSource::Query => self.query.clone(),
            DataSource::Params => self.params.clone(),
            DataSource::Merged => {
                let mut merged = self.params.clone();
                merged.extend(self.body_object());
                merged.extend(self.query.clone());
                merged
            }
        }
    }

    fn body_object(&self) -> Map<String, Value> {
        match &self.body {
            Value::Object(object) => object.clone(),
            _ => Map::new(),
        }
    }
}
