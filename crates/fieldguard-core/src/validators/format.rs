//! String shape checks.
//!
//! Each of these requires a string: absent values, `null` and non-strings
//! fail with the rule's message.

use regex::Regex;
use serde_json::Value;

use crate::validator::Validator;
use crate::validators::country;

/// Build a validator that accepts strings satisfying `accept`.
fn string_rule<F>(accept: F, message: &'static str) -> Validator
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Validator::new(move |value, key| match value {
        Some(Value::String(s)) if accept(s) => None,
        _ => Some(format!("{key} {message}")),
    })
}

/// Fails unless the value is a string matched by `pattern`.
///
/// The pattern is used as given; anchor it (`^...$`) to require a full match.
pub fn matches_pattern(pattern: Regex) -> Validator {
    string_rule(
        move |s| pattern.is_match(s),
        "does not match the required pattern",
    )
}

/// Fails unless the value has the shape `local@domain.tld`.
///
/// No whitespace anywhere, exactly one `@`, and a dot in the domain that is
/// neither its first nor its last character.
pub fn is_email() -> Validator {
    string_rule(looks_like_email, "must be a valid email")
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Fails unless the value is a non-empty string of ASCII letters.
pub fn is_alpha() -> Validator {
    string_rule(
        |s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()),
        "must only contain alphabetic characters",
    )
}

/// Fails unless the value is a non-empty string of ASCII letters and digits.
pub fn is_alphanumeric() -> Validator {
    string_rule(
        |s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()),
        "must only contain alphanumeric characters",
    )
}

/// Fails unless the string is unchanged by lower-casing.
pub fn is_lowercase() -> Validator {
    string_rule(|s| s == s.to_lowercase(), "must be in lowercase")
}

/// Fails unless the string is unchanged by upper-casing.
pub fn is_uppercase() -> Validator {
    string_rule(|s| s == s.to_uppercase(), "must be in uppercase")
}

/// Fails unless the value is an assigned ISO 3166-1 alpha-2 code.
pub fn is_country_code() -> Validator {
    string_rule(
        country::is_assigned,
        "must be a valid country code (e.g. US, IN, GB)",
    )
}

/// Fails unless the value is a 24-character hexadecimal object ID.
pub fn is_mongo_id() -> Validator {
    string_rule(
        |s| s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit()),
        "must be a valid MongoDB ID",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(v: &Validator, value: Value) -> Option<String> {
        v.check(Some(&value), "field")
    }

    #[test]
    fn pattern_matches_strings_only() {
        let v = matches_pattern(Regex::new(r"^\d{3}-\d{4}$").unwrap());
        assert_eq!(run(&v, json!("555-1234")), None);
        assert_eq!(
            run(&v, json!("5551234")).as_deref(),
            Some("field does not match the required pattern")
        );
        assert_eq!(
            run(&v, json!(5551234)).as_deref(),
            Some("field does not match the required pattern")
        );
    }

    #[test]
    fn pattern_metacharacters_are_not_special_in_keys() {
        let v = matches_pattern(Regex::new("^a+$").unwrap());
        assert_eq!(
            v.check(Some(&json!("b")), "weird.(key)*").as_deref(),
            Some("weird.(key)* does not match the required pattern")
        );
    }

    #[test]
    fn email_shapes() {
        let v = is_email();
        for ok in ["ann@example.com", "a.b+c@sub.example.org", "x@y.z"] {
            assert_eq!(run(&v, json!(ok)), None, "{ok}");
        }
        for bad in [
            "ann",
            "ann@example",
            "@example.com",
            "ann@.com",
            "ann@example.",
            "ann @example.com",
            "ann@ex@ample.com",
            "",
        ] {
            assert_eq!(
                run(&v, json!(bad)).as_deref(),
                Some("field must be a valid email"),
                "{bad}"
            );
        }
        assert!(v.check(None, "email").is_some());
    }

    #[test]
    fn alpha_and_alphanumeric() {
        assert_eq!(run(&is_alpha(), json!("Hello")), None);
        assert_eq!(
            run(&is_alpha(), json!("Hello1")).as_deref(),
            Some("field must only contain alphabetic characters")
        );
        assert!(run(&is_alpha(), json!("")).is_some());
        assert_eq!(run(&is_alphanumeric(), json!("abc123")), None);
        assert_eq!(
            run(&is_alphanumeric(), json!("abc-123")).as_deref(),
            Some("field must only contain alphanumeric characters")
        );
    }

    #[test]
    fn case_checks() {
        assert_eq!(run(&is_lowercase(), json!("abc 1")), None);
        assert_eq!(
            run(&is_lowercase(), json!("aBc")).as_deref(),
            Some("field must be in lowercase")
        );
        assert_eq!(run(&is_uppercase(), json!("ABC")), None);
        assert_eq!(
            run(&is_uppercase(), json!("ABc")).as_deref(),
            Some("field must be in uppercase")
        );
        assert!(run(&is_uppercase(), json!(1)).is_some());
    }

    #[test]
    fn country_codes() {
        assert_eq!(run(&is_country_code(), json!("US")), None);
        assert_eq!(
            run(&is_country_code(), json!("ZZ")).as_deref(),
            Some("field must be a valid country code (e.g. US, IN, GB)")
        );
        assert!(run(&is_country_code(), json!(1)).is_some());
    }

    #[test]
    fn mongo_ids() {
        let v = is_mongo_id();
        assert_eq!(run(&v, json!("507f1f77bcf86cd799439011")), None);
        assert_eq!(run(&v, json!("507F1F77BCF86CD799439011")), None);
        assert_eq!(
            v.check(Some(&json!("42")), "id").as_deref(),
            Some("id must be a valid MongoDB ID")
        );
        assert!(run(&v, json!("507f1f77bcf86cd79943901g")).is_some());
        assert!(run(&v, json!(42)).is_some());
    }
}
