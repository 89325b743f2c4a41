//! Calendar-date normalization shared by the loader, the filter selection and
//! the aging reference timestamp.
//!
//! Any time-of-day component is discarded: two values that fall on the same
//! calendar day normalize to the same `NaiveDate`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::TimberError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Normalize a textual date or timestamp to its calendar day.
pub fn normalize_date(value: &str) -> Result<NaiveDate, TimberError> {
    normalize_timestamp(value).map(|ts| ts.date())
}

/// Parse a textual date or timestamp. Date-only values land on midnight.
///
/// RFC 3339 values keep the wall-clock time of their own offset, so
/// `2025-07-27T23:30:00-05:00` is still July 27th.
pub fn normalize_timestamp(value: &str) -> Result<NaiveDateTime, TimberError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(value, "empty value"));
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.naive_local());
    }

    Err(invalid(value, "unrecognized date format"))
}

/// Normalize a loosely typed value (TOML config, JSON request) to a calendar day.
///
/// Accepts strings and native TOML dates/datetimes. Anything else is an
/// `InvalidDate`.
pub fn normalize_toml_date(value: &toml::Value) -> Result<NaiveDate, TimberError> {
    match value {
        toml::Value::String(s) => normalize_date(s),
        toml::Value::Datetime(dt) => normalize_date(&dt.to_string()),
        other => Err(invalid(&other.to_string(), "expected a date string")),
    }
}

/// Like [`normalize_toml_date`] but keeps the time of day.
pub fn normalize_toml_timestamp(value: &toml::Value) -> Result<NaiveDateTime, TimberError> {
    match value {
        toml::Value::String(s) => normalize_timestamp(s),
        toml::Value::Datetime(dt) => normalize_timestamp(&dt.to_string()),
        other => Err(invalid(&other.to_string(), "expected a timestamp string")),
    }
}

fn invalid(value: &str, cause: &str) -> TimberError {
    TimberError::InvalidDate {
        value: value.to_string(),
        cause: cause.to_string(),
    }
}
