//! Length and magnitude bounds.
//!
//! All bounds skip absent and `null` values. A present value of the wrong
//! type fails with the bound's own message: `min_length(3)` on a number is
//! not a string of at least three characters.
//!
//! String lengths count Unicode scalar values, not bytes.

use serde_json::Value;

use crate::validator::{present, Validator};

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Fails for strings shorter than `min` characters.
pub fn min_length(min: usize) -> Validator {
    Validator::new(move |value, key| match present(value) {
        None => None,
        Some(Value::String(s)) if char_len(s) >= min => None,
        Some(_) => Some(format!("{key} must be at least {min} characters")),
    })
}

/// Fails for strings longer than `max` characters.
pub fn max_length(max: usize) -> Validator {
    Validator::new(move |value, key| match present(value) {
        None => None,
        Some(Value::String(s)) if char_len(s) <= max => None,
        Some(_) => Some(format!("{key} must not exceed {max} characters")),
    })
}

/// Fails for strings whose length falls outside `min..=max`.
pub fn is_length(min: usize, max: usize) -> Validator {
    Validator::new(move |value, key| match present(value) {
        None => None,
        Some(Value::String(s)) if (min..=max).contains(&char_len(s)) => None,
        Some(_) => Some(format!(
            "{key} must be between {min} and {max} characters long"
        )),
    })
}

/// Fails for numbers below `min`.
pub fn min_value(min: f64) -> Validator {
    Validator::new(move |value, key| match present(value) {
        None => None,
        Some(v) if v.as_f64().is_some_and(|n| n >= min) => None,
        Some(_) => Some(format!("{key} must be at least {min}")),
    })
}

/// Fails for numbers above `max`.
pub fn max_value(max: f64) -> Validator {
    Validator::new(move |value, key| match present(value) {
        None => None,
        Some(v) if v.as_f64().is_some_and(|n| n <= max) => None,
        Some(_) => Some(format!("{key} must not exceed {max}")),
    })
}

/// Fails for numbers that are zero or negative.
pub fn is_positive() -> Validator {
    Validator::new(|value, key| match present(value) {
        None => None,
        Some(v) if v.as_f64().is_some_and(|n| n > 0.0) => None,
        Some(_) => Some(format!("{key} must be a positive number")),
    })
}

/// Fails for numbers that are zero or positive.
pub fn is_negative() -> Validator {
    Validator::new(|value, key| match present(value) {
        None => None,
        Some(v) if v.as_f64().is_some_and(|n| n < 0.0) => None,
        Some(_) => Some(format!("{key} must be a negative number")),
    })
}

/// Fails unless the value is a number with no fractional part.
///
/// `3.0` counts as an integer. Unlike the other bounds this is also a type
/// check, so an absent value fails.
pub fn is_integer() -> Validator {
    Validator::new(|value, key| {
        let integral = match value {
            Some(Value::Number(n)) => {
                n.is_i64()
                    || n.is_u64()
                    || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
            }
            _ => false,
        };
        if integral {
            None
        } else {
            Some(format!("{key} must be an integer"))
        }
    })
}

/// Fails for arrays with fewer than `min` items.
pub fn array_min_length(min: usize) -> Validator {
    Validator::new(move |value, key| match present(value) {
        None => None,
        Some(Value::Array(items)) if items.len() >= min => None,
        Some(_) => Some(format!("{key} must contain at least {min} items")),
    })
}

/// Fails for arrays with more than `max` items.
pub fn array_max_length(max: usize) -> Validator {
    Validator::new(move |value, key| match present(value) {
        None => None,
        Some(Value::Array(items)) if items.len() <= max => None,
        Some(_) => Some(format!("{key} must not contain more than {max} items")),
    })
}
