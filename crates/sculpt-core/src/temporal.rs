//! # Temporal Recognition: RFC 3339 Date-Times
//!
//! JSON has no date type, so a date-time travels as a string. A value is
//! accepted as a date-time when it parses as RFC 3339 with an explicit
//! offset (`Z` or `±HH:MM`); the offset is normalized to UTC.
//!
//! Calendar dates (`2026-01-15`) are not RFC 3339 date-times and are
//! rejected here. Date fields share this predicate and add no calendar-only
//! narrowing of their own.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Parse an RFC 3339 string, converting any offset to UTC.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whether `value` is a string holding an RFC 3339 date-time.
pub fn is_datetime(value: &Value) -> bool {
    value.as_str().and_then(parse_datetime).is_some()
}
