//! # Transformers
//!
//! Normalization is not validation. A [`Transformer`] maps a value to a new
//! value and never produces a message; it runs in its own pass, before any
//! validator of the same field, so validators always see normalized input.
//!
//! Transformers only touch values that are present. They never invent a
//! value for an absent key.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

type ApplyFn = dyn Fn(Value) -> Value + Send + Sync;

/// A `value -> value` normalization step.
#[derive(Clone)]
pub struct Transformer {
    name: &'static str,
    apply: Arc<ApplyFn>,
}

impl Transformer {
    /// Wrap a function as a named transformer.
    pub fn new<F>(name: &'static str, apply: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name,
            apply: Arc::new(apply),
        }
    }

    /// The transformer's name, used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the transformation.
    pub fn apply(&self, value: Value) -> Value {
        (self.apply)(value)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transformer").field(&self.name).finish()
    }
}

/// Trim leading and trailing whitespace from strings. Other values pass through.
pub fn trim_string() -> Transformer {
    Transformer::new("trim", |value| match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other,
    })
}

/// Upper-case the first character of a string. Other values pass through.
pub fn capitalize_string() -> Transformer {
    Transformer::new("capitalize", |value| match value {
        Value::String(s) => {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => Value::String(first.to_uppercase().chain(chars).collect()),
                None => Value::String(s),
            }
        }
        other => other,
    })
}
