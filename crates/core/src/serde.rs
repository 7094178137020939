//! Serde helper functions for persisted dashboard data.
//!
//! Records written by older dashboard builds store optional text as empty
//! strings and planned dates either as `YYYY-MM-DD` or as full RFC 3339
//! timestamps. These helpers normalise both shapes on the way in.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize a calendar date.
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (the date part is kept).
pub fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_lenient_date(&s).map_err(serde::de::Error::custom)
}

/// Parses a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_lenient_date(s: &str) -> Result<NaiveDate, String> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| format!("invalid date: {trimmed}"))
}
