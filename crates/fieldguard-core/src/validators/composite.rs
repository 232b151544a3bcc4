//! Validators built from other validators.

use serde_json::Value;

use crate::schema::Schema;
use crate::validator::{first_failure, Validator};

/// Validate every element of an array with `element_validators`.
///
/// Elements are checked in order; for each element the validators run in
/// order. The first failure is returned, reported under the key
/// `{key}[{index}]`, e.g. `tags[1] must be a number`.
pub fn array_elements(element_validators: Vec<Validator>) -> Validator {
    Validator::new(move |value, key| {
        let Some(Value::Array(items)) = value else {
            return Some(format!("{key} must be an array"));
        };
        items.iter().enumerate().find_map(|(index, item)| {
            first_failure(&element_validators, Some(item), &format!("{key}[{index}]"))
        })
    })
}

/// Validate the fields of a nested object against `schema`.
///
/// Every field declared in `schema` is checked, whether or not the object
/// contains it, so nested `is_required` works. Failures are reported under
/// `{key}.{field}`; the first one is returned. Only synchronous validators
/// of the nested schema apply.
pub fn object_keys(schema: Schema) -> Validator {
    Validator::new(move |value, key| match value {
        Some(Value::Object(object)) => schema.first_nested_failure(object, key),
        _ => Some(format!("{key} must be an object")),
    })
}

/// Fails unless the value is an object containing `required_key`.
pub fn is_key_in_object(required_key: impl Into<String>) -> Validator {
    let required_key = required_key.into();
    Validator::new(move |value, key| match value {
        Some(Value::Object(object)) if object.contains_key(&required_key) => None,
        _ => Some(format!("{key} must contain the key '{required_key}'")),
    })
}

/// Adapt a key-less check into a validator.
///
/// `check` sees only the value; a returned message is prefixed with the
/// field name as `{key}: {message}`.
///
/// ```
/// use fieldguard_core::validators::custom;
/// use serde_json::json;
///
/// let no_admin = custom(|value| match value.and_then(|v| v.as_str()) {
///     Some("admin") => Some("reserved name".to_string()),
///     _ => None,
/// });
/// assert_eq!(
///     no_admin.check(Some(&json!("admin")), "username").as_deref(),
///     Some("username: reserved name")
/// );
/// ```
pub fn custom<F>(check: F) -> Validator
where
    F: Fn(Option<&Value>) -> Option<String> + Send + Sync + 'static,
{
    Validator::new(move |value, key| check(value).map(|message| format!("{key}: {message}")))
}
