//! # Date Rules
//!
//! JSON has no date type, so a date is a string in one of two forms:
//!
//! - RFC 3339 (`2024-05-01T12:00:00Z`, `2024-05-01T14:00:00+02:00`), or
//! - a calendar date (`2024-05-01`), read as midnight UTC.
//!
//! [`is_date`] requires such a string. The comparison rules skip absent
//! and `null` values, and fail with their own message on a present value
//! that is not a date. Boundaries in messages are rendered as ISO 8601
//! with millisecond precision and a `Z` suffix.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

use crate::validator::{present, Validator};

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date into UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Date-comparison validator: absent values pass, non-dates fail, dates
/// fail when `accept` rejects them.
fn date_rule<F, M>(accept: F, message: M) -> Validator
where
    F: Fn(&DateTime<Utc>) -> bool + Send + Sync + 'static,
    M: Fn(&str) -> String + Send + Sync + 'static,
{
    Validator::new(move |value, key| {
        let value = present(value)?;
        match value.as_str().and_then(parse_date) {
            Some(dt) if accept(&dt) => None,
            _ => Some(message(key)),
        }
    })
}

/// Fails unless the value is a date string.
pub fn is_date() -> Validator {
    Validator::new(|value, key| match value {
        Some(Value::String(s)) if parse_date(s).is_some() => None,
        _ => Some(format!("{key} must be a valid date")),
    })
}

/// Fails for dates at or before the moment of the check.
pub fn is_future_date() -> Validator {
    date_rule(
        |dt| *dt > Utc::now(),
        |key| format!("{key} must be a future date"),
    )
}

/// Fails for dates at or after the moment of the check.
pub fn is_past_date() -> Validator {
    date_rule(
        |dt| *dt < Utc::now(),
        |key| format!("{key} must be a past date"),
    )
}

/// Fails for dates at or after `limit`.
pub fn is_before_date(limit: DateTime<Utc>) -> Validator {
    let rendered = iso(&limit);
    date_rule(
        move |dt| *dt < limit,
        move |key| format!("{key} must be before {rendered}"),
    )
}

/// Fails for dates outside `start..=end`.
pub fn is_date_in_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Validator {
    let (from, to) = (iso(&start), iso(&end));
    date_rule(
        move |dt| *dt >= start && *dt <= end,
        move |key| format!("{key} must be between {from} and {to}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn parse_accepts_rfc3339_and_calendar_dates() {
        assert_eq!(parse_date("2024-05-01"), Some(utc(2024, 5, 1)));
        assert_eq!(parse_date("2024-05-01T00:00:00Z"), Some(utc(2024, 5, 1)));
        assert_eq!(
            parse_date("2024-05-01T02:00:00+02:00"),
            Some(utc(2024, 5, 1))
        );
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn is_date_requires_parseable_string() {
        let v = is_date();
        assert_eq!(v.check(Some(&json!("2024-02-29")), "d"), None);
        assert_eq!(
            v.check(Some(&json!("2023-02-29")), "d").as_deref(),
            Some("d must be a valid date")
        );
        assert!(v.check(Some(&json!(1_700_000_000)), "d").is_some());
        assert!(v.check(None, "d").is_some());
    }

    #[test]
    fn future_and_past() {
        let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();
        let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();

        assert_eq!(is_future_date().check(Some(&json!(tomorrow)), "d"), None);
        assert_eq!(
            is_future_date().check(Some(&json!(yesterday)), "d").as_deref(),
            Some("d must be a future date")
        );
        assert_eq!(is_past_date().check(Some(&json!(yesterday)), "d"), None);
        assert_eq!(
            is_past_date().check(Some(&json!(tomorrow)), "d").as_deref(),
            Some("d must be a past date")
        );
    }

    #[test]
    fn comparisons_skip_absent_but_reject_non_dates() {
        assert_eq!(is_future_date().check(None, "d"), None);
        assert_eq!(is_past_date().check(Some(&Value::Null), "d"), None);
        assert_eq!(
            is_future_date().check(Some(&json!(true)), "d").as_deref(),
            Some("d must be a future date")
        );
    }

    #[test]
    fn before_date_message_uses_iso_millis() {
        let v = is_before_date(utc(2025, 1, 1));
        assert_eq!(v.check(Some(&json!("2024-12-31")), "start"), None);
        assert_eq!(
            v.check(Some(&json!("2025-01-01")), "start").as_deref(),
            Some("start must be before 2025-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn date_range_is_inclusive() {
        let v = is_date_in_range(utc(2024, 1, 1), utc(2024, 12, 31));
        assert_eq!(v.check(Some(&json!("2024-01-01")), "d"), None);
        assert_eq!(v.check(Some(&json!("2024-12-31")), "d"), None);
        assert_eq!(
            v.check(Some(&json!("2025-01-01")), "d").as_deref(),
            Some("d must be between 2024-01-01T00:00:00.000Z and 2024-12-31T00:00:00.000Z")
        );
    }
}
