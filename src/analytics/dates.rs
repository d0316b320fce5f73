//! Date normalization
//!
//! Collections store dates in whatever shape their writers produced:
//! epoch milliseconds, ISO-8601 with a trailing `Z`, ISO-8601 with an
//! explicit offset, or naive timestamps. All of them normalize through
//! UTC into the configured reporting zone before the calendar day is
//! extracted, so a record never shifts a day because one writer was
//! timezone-aware and another was not.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;

/// Canonical `YYYY-MM-DD` bucket key in the reporting zone.
/// Unparseable input yields `None`, never an error; callers skip the
/// record for day-bucketing without dropping it from other tallies.
pub fn day_key(raw: &Value, tz: Tz) -> Option<String> {
    let instant = instant_from_value(raw)?;
    Some(instant.with_timezone(&tz).format("%Y-%m-%d").to_string())
}

/// Full ISO timestamp in the reporting zone, for "recent items" output.
pub fn iso_in_zone(raw: &Value, tz: Tz) -> Option<String> {
    let instant = instant_from_value(raw)?;
    Some(instant.with_timezone(&tz).to_rfc3339())
}

/// Interpret a stored field value as a UTC instant. Numbers are epoch
/// milliseconds; strings go through `parse_instant`.
pub fn instant_from_value(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::Number(n) => DateTime::<Utc>::from_timestamp_millis(n.as_i64()?),
        Value::String(s) => parse_instant(s),
        _ => None,
    }
}

/// Parse an ISO-8601 string. A literal `Z` suffix is normalized to
/// `+00:00` first; naive timestamps are assumed UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let normalized = raw.replace('Z', "+00:00");
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
