//! # Configuration Errors
//!
//! Field failures are values ([`crate::ValidationErrors`]), never errors.
//! The only error type in this crate describes a validator that was
//! configured wrongly: an unknown data source, a malformed route template,
//! or a rule specification that cannot be compiled. All of them surface when
//! the validator is built, before the first request is served.

use thiserror::Error;

/// A mistake in how a validator was configured.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The data source name is not one of `body`, `query`, `params`, `merged`.
    #[error("unknown data source \"{0}\" (expected body, query, params or merged)")]
    UnknownSource(String),

    /// A route template could not be compiled.
    #[error("invalid route template \"{template}\": {reason}")]
    InvalidTemplate {
        /// The template as written.
        template: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The same route template was declared twice.
    #[error("route template \"{0}\" is declared more than once")]
    DuplicateRoute(String),

    /// A rule name in a declarative rule list is not known.
    #[error("unknown rule \"{0}\"")]
    UnknownRule(String),

    /// A parameterized rule was given an argument of the wrong shape.
    #[error("invalid argument for rule \"{rule}\": {reason}")]
    InvalidArgument {
        /// The rule name.
        rule: String,
        /// What was expected.
        reason: String,
    },

    /// A rule was used where it has no meaning (a transformer inside `each`).
    #[error("rule \"{rule}\" cannot be used inside {context}")]
    MisplacedRule {
        /// The rule name.
        rule: String,
        /// Where it was found.
        context: String,
    },

    /// The configuration document could not be parsed.
    #[error("configuration parse error: {0}")]
    Parse(String),

    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_source_names_the_value() {
        let err = ConfigError::UnknownSource("headers".into());
        let msg = err.to_string();
        assert!(msg.contains("headers"));
        assert!(msg.contains("merged"));
    }

    #[test]
    fn invalid_template_display() {
        let err = ConfigError::InvalidTemplate {
            template: "users/:id".into(),
            reason: "must start with '/'".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid route template \"users/:id\": must start with '/'"
        );
    }

    #[test]
    fn yaml_errors_convert_to_parse() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{ not: a list").unwrap_err();
        let err = ConfigError::from(yaml_err);
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.yaml");
        let err = ConfigError::from(io);
        assert!(err.to_string().contains("missing.yaml"));
    }
}
