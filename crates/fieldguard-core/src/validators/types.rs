//! Runtime type and presence checks.

use serde_json::Value;

use crate::validator::Validator;

/// Fails unless the value is a JSON string.
pub fn is_string() -> Validator {
    Validator::new(|value, key| match value {
        Some(Value::String(_)) => None,
        _ => Some(format!("{key} must be a string")),
    })
}

/// Fails unless the value is a JSON number.
pub fn is_number() -> Validator {
    Validator::new(|value, key| match value {
        Some(Value::Number(_)) => None,
        _ => Some(format!("{key} must be a number")),
    })
}

/// Fails unless the value is `true` or `false`.
pub fn is_boolean() -> Validator {
    Validator::new(|value, key| match value {
        Some(Value::Bool(_)) => None,
        _ => Some(format!("{key} must be a boolean")),
    })
}

/// Fails unless the value is a JSON array.
pub fn is_array() -> Validator {
    Validator::new(|value, key| match value {
        Some(Value::Array(_)) => None,
        _ => Some(format!("{key} must be an array")),
    })
}

/// Fails unless the value is a JSON object. Arrays and `null` are not objects.
pub fn is_object() -> Validator {
    Validator::new(|value, key| match value {
        Some(Value::Object(_)) => None,
        _ => Some(format!("{key} must be an object")),
    })
}

/// Fails when the key is absent or explicitly `null`.
///
/// Empty strings, `0` and `false` are present values and pass.
pub fn is_required() -> Validator {
    Validator::new(|value, key| match value {
        None | Some(Value::Null) => Some(format!("{key} is required")),
        Some(_) => None,
    })
}
