//! Reusable predicates for struct-level rules.
//!
//! These cover constraints that a per-field rule cannot express: relations
//! between two fields, or formats the rule vocabulary has no tag for.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

/// Minimum length of a delivery time window, in minutes.
pub const MIN_DELIVERY_WINDOW_MINUTES: u32 = 60;

const URL_LIKE_PATTERN: &str = r"(?i)(?:\bhttps?://\S+|\bwww\.\S+|\b[a-z0-9][a-z0-9-]*(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b)";

static URL_LIKE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(URL_LIKE_PATTERN).ok());

/// Minutes since midnight for an `hour:minute` pair.
///
/// `None` unless `hour` is in `0..=23` and `minute` in `0..=59`.
pub fn minutes_of_day(hour: u32, minute: u32) -> Option<u32> {
    (hour <= 23 && minute <= 59).then(|| hour * 60 + minute)
}

/// Whether `to` lies at least `min_minutes` after `from` within one day.
///
/// Both bounds are `(hour, minute)` pairs. A bound outside the clock is left
/// to the per-field range rules and does not fail the window.
pub fn window_is_at_least(from: (u32, u32), to: (u32, u32), min_minutes: u32) -> bool {
    match (minutes_of_day(from.0, from.1), minutes_of_day(to.0, to.1)) {
        (Some(from), Some(to)) => to >= from && to - from >= min_minutes,
        _ => true,
    }
}

/// Whether `text` contains something that looks like a URL.
pub fn contains_url(text: &str) -> bool {
    URL_LIKE.as_ref().is_some_and(|re| re.is_match(text))
}

/// Whether `value` is a calendar date in `YYYY-MM-DD` form.
pub fn is_iso_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Whether `value` is an RFC 3339 timestamp.
pub fn is_rfc3339(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_needs_an_hour() {
        assert!(window_is_at_least((9, 0), (10, 0), MIN_DELIVERY_WINDOW_MINUTES));
        assert!(window_is_at_least((9, 30), (17, 45), MIN_DELIVERY_WINDOW_MINUTES));
        assert!(!window_is_at_least((9, 0), (9, 59), MIN_DELIVERY_WINDOW_MINUTES));
        assert!(!window_is_at_least((18, 0), (9, 0), MIN_DELIVERY_WINDOW_MINUTES));
    }

    #[test]
    fn out_of_clock_bounds_do_not_overflow() {
        assert_eq!(minutes_of_day(23, 59), Some(1439));
        assert_eq!(minutes_of_day(24, 0), None);
        assert_eq!(minutes_of_day(u32::MAX, 0), None);
        assert_eq!(minutes_of_day(0, u32::MAX), None);
        assert!(window_is_at_least((u32::MAX, 0), (10, 0), MIN_DELIVERY_WINDOW_MINUTES));
        assert!(window_is_at_least((9, 0), (0, u32::MAX), MIN_DELIVERY_WINDOW_MINUTES));
    }

    #[test]
    fn url_detection_is_lenient() {
        assert!(contains_url("see https://www.infobip.com/docs"));
        assert!(contains_url("visit www.example.org today"));
        assert!(contains_url("details at example.com"));
        assert!(!contains_url("Hello there, no links here"));
    }

    #[test]
    fn iso_dates_must_be_zero_padded_and_real() {
        assert!(is_iso_date("1990-02-28"));
        assert!(!is_iso_date("1990-2-28"));
        assert!(!is_iso_date("1990-02-30"));
        assert!(!is_iso_date("28.02.1990"));
    }

    #[test]
    fn rfc3339_timestamps() {
        assert!(is_rfc3339("2025-06-01T10:00:00Z"));
        assert!(is_rfc3339("2025-06-01T10:00:00.123+02:00"));
        assert!(!is_rfc3339("2025-06-01 10:00"));
    }
}
