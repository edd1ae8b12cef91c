//! UTC calendar helpers: timestamp parsing, day rounding, and label formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

/// Naive date-time layouts accepted after RFC 3339, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a dataset timestamp string into epoch milliseconds.
///
/// Accepts RFC 3339 with an offset (`2024-01-01T00:00:00Z`), naive
/// date-times with `T` or space separators, and bare dates. Naive values are
/// taken as UTC.
///
/// # Returns
///
/// `None` if no supported layout matches.
///
/// # Examples
///
/// ```
/// use energy_series::series::clock::parse_timestamp;
///
/// assert_eq!(parse_timestamp("1970-01-01T00:01:00Z"), Some(60_000));
/// assert_eq!(parse_timestamp("1970-01-01 00:01"), Some(60_000));
/// assert_eq!(parse_timestamp("yesterday"), None);
/// ```
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

fn to_utc(timestamp_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp_ms)
}

/// Whether `timestamp_ms` falls inside the representable calendar range.
pub fn is_representable(timestamp_ms: i64) -> bool {
    to_utc(timestamp_ms).is_some()
}

/// Start of the UTC day containing `timestamp_ms`.
///
/// Out-of-range timestamps are returned unchanged.
pub fn floor_to_midnight_utc(timestamp_ms: i64) -> i64 {
    to_utc(timestamp_ms)
        .and_then(|dt| dt.date_naive().and_hms_milli_opt(0, 0, 0, 0))
        .map_or(timestamp_ms, |naive| naive.and_utc().timestamp_millis())
}

/// Last millisecond (23:59:59.999) of the UTC day containing `timestamp_ms`.
pub fn ceil_to_end_of_day_utc(timestamp_ms: i64) -> i64 {
    to_utc(timestamp_ms)
        .and_then(|dt| dt.date_naive().and_hms_milli_opt(23, 59, 59, 999))
        .map_or(timestamp_ms, |naive| naive.and_utc().timestamp_millis())
}

/// UTC `(hour, minute)` of a timestamp.
pub fn utc_hour_minute(timestamp_ms: i64) -> Option<(u32, u32)> {
    to_utc(timestamp_ms).map(|dt| (dt.hour(), dt.minute()))
}

/// ISO-8601 truncated to seconds, without zone suffix (`2024-01-01T00:00:00`).
pub fn format_tick(timestamp_ms: i64) -> String {
    to_utc(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Calendar date (`YYYY-MM-DD`) of a timestamp.
pub fn format_date(timestamp_ms: i64) -> String {
    to_utc(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
