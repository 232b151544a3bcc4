//! # Route Configuration
//!
//! A route-aware validator can be declared in a YAML (or JSON) document
//! instead of code:
//!
//! ```yaml
//! body_limit: 1048576          # optional, bytes
//! routes:
//!   - path: /users/:id
//!     source: params           # body | query | params | merged (default body)
//!     fields:
//!       id: [required, mongo_id]
//!   - path: /users
//!     fields:
//!       name: [trim, required, string, { length: [2, 40] }]
//!       email: [required, email]
//! ```
//!
//! Loading parses and checks every rule; [`ValidationConfig::build`] then
//! compiles the route templates. Either step fails with a [`ConfigError`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::request::{RequestValidator, DEFAULT_BODY_LIMIT};
use crate::source::DataSource;
use crate::spec::{compile_schema, FieldSpec};

/// One declared route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Route template, e.g. `/users/:id`.
    pub path: String,
    /// Section validated. Defaults to the body.
    #[serde(default)]
    pub source: DataSource,
    /// Field name to rules.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,
}

/// A whole configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Maximum body size buffered for validation, in bytes.
    #[serde(default)]
    pub body_limit: Option<usize>,
    /// Routes, tried in this order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl ValidationConfig {
    /// Read a configuration file. Files ending in `.json` are parsed as
    /// JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`]
    /// or a rule error if its content is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_yaml(&content)?,
        };
        tracing::debug!(
            path = %path.display(),
            routes = config.routes.len(),
            "loaded validation config"
        );
        Ok(config)
    }

    /// Parse a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The body limit in effect.
    pub fn effective_body_limit(&self) -> usize {
        self.body_limit.unwrap_or(DEFAULT_BODY_LIMIT)
    }

    /// Compile into a route-aware [`RequestValidator`].
    ///
    /// # Errors
    ///
    /// Fails on a malformed or duplicate route template, or on a rule that
    /// cannot be used where it is declared.
    pub fn build(&self) -> Result<RequestValidator, ConfigError> {
        let mut builder = RequestValidator::routes().body_limit(self.effective_body_limit());
        for route in &self.routes {
            builder = builder.route_with(&route.path, route.source, compile_schema(&route.fields)?);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Outcome;
    use crate::source::RequestData;
    use serde_json::json;
    use std::io::Write;

    const CONFIG: &str = r#"
body_limit: 1024
routes:
  - path: /users/:id
    source: params
    fields:
      id: [required, mongo_id]
  - path: /users
    fields:
      name: [trim, required, string, { length: [2, 40] }]
      email: [required, email]
      tags: { each: [string] }
"#;

    #[test]
    fn parses_document() {
        let config = ValidationConfig::from_yaml(CONFIG).unwrap();
        assert_eq!(config.body_limit, Some(1024));
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].source, DataSource::Params);
        assert_eq!(config.routes[1].source, DataSource::Body);
        assert_eq!(config.routes[1].fields.len(), 3);
    }

    #[test]
    fn builds_working_validator() {
        let validator = ValidationConfig::from_yaml(CONFIG).unwrap().build().unwrap();
        assert_eq!(validator.body_limit(), 1024);

        let bad_id = validator.validate(&RequestData::new("/users/42"));
        assert_eq!(
            bad_id.errors().unwrap().get("id"),
            Some("id must be a valid MongoDB ID")
        );

        let user = RequestData::new("/users").with_body(json!({
            "name": "  Ann  ",
            "email": "ann@example.com",
            "tags": ["a", 1]
        }));
        let outcome = validator.validate(&user);
        let errors = outcome.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("tags"), Some("tags[1] must be a string"));

        assert_eq!(
            validator.validate(&RequestData::new("/other")),
            Outcome::Unmatched
        );
    }

    #[test]
    fn default_body_limit() {
        let config = ValidationConfig::from_yaml("routes: []").unwrap();
        assert_eq!(config.effective_body_limit(), DEFAULT_BODY_LIMIT);
        assert!(config.build().unwrap().entries().is_empty());
    }

    #[test]
    fn unknown_source_is_rejected() {
        let err = ValidationConfig::from_yaml("routes:\n  - path: /a\n    source: cookies\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = ValidationConfig::from_yaml("routes: []\nbodylimit: 3\n").unwrap_err();
        assert!(err.to_string().contains("bodylimit"));
    }

    #[test]
    fn unknown_rule_is_rejected_on_load() {
        let err = ValidationConfig::from_yaml(
            "routes:\n  - path: /a\n    fields:\n      x: [required, sparkly]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("sparkly"));
    }

    #[test]
    fn bad_template_is_rejected_on_build() {
        let config = ValidationConfig::from_yaml("routes:\n  - path: users\n").unwrap();
        assert!(matches!(
            config.build().unwrap_err(),
            ConfigError::InvalidTemplate { .. }
        ));
    }

    #[test]
    fn loads_yaml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("rules.yaml");
        std::fs::File::create(&yaml_path)
            .unwrap()
            .write_all(CONFIG.as_bytes())
            .unwrap();
        assert_eq!(ValidationConfig::load(&yaml_path).unwrap().routes.len(), 2);

        let json_path = dir.path().join("rules.json");
        std::fs::write(
            &json_path,
            r#"{"routes":[{"path":"/q","source":"query","fields":{"q":"required"}}]}"#,
        )
        .unwrap();
        let config = ValidationConfig::load(&json_path).unwrap();
        assert_eq!(config.routes[0].source, DataSource::Query);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ValidationConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
