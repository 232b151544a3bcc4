//! # Validator Handle
//!
//! A [`Validator`] scores one value against one rule. It receives the value
//! (absent keys arrive as `None`, explicit JSON `null` as `Some(Value::Null)`)
//! and the field name used in messages, and returns `None` when the value is
//! acceptable or `Some(message)` otherwise.
//!
//! Validators are cheap to clone and shared across requests. Construction
//! captures any parameters (a length bound, a regex); checking never mutates.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

type CheckFn = dyn Fn(Option<&Value>, &str) -> Option<String> + Send + Sync;

/// A synchronous validation rule for a single value.
#[derive(Clone)]
pub struct Validator {
    check: Arc<CheckFn>,
}

impl Validator {
    /// Wrap a function `(value, key) -> Option<message>` as a validator.
    ///
    /// ```
    /// use fieldguard_core::Validator;
    /// use serde_json::json;
    ///
    /// let even = Validator::new(|value, key| match value.and_then(|v| v.as_i64()) {
    ///     Some(n) if n % 2 == 0 => None,
    ///     _ => Some(format!("{key} must be even")),
    /// });
    /// assert_eq!(even.check(Some(&json!(4)), "n"), None);
    /// assert_eq!(even.check(Some(&json!(3)), "n").as_deref(), Some("n must be even"));
    /// ```
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(Option<&Value>, &str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
        }
    }

    /// Run the rule. `key` is the name reported in the message.
    pub fn check(&self, value: Option<&Value>, key: &str) -> Option<String> {
        (self.check)(value, key)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Run validators in order and return the first failure.
pub(crate) fn first_failure(
    validators: &[Validator],
    value: Option<&Value>,
    key: &str,
) -> Option<String> {
    validators.iter().find_map(|v| v.check(value, key))
}

/// Treat JSON `null` like an absent key.
pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}
