//! Timestamp parsing for Timewarrior data.
//!
//! Timewarrior writes UTC timestamps in the ISO 8601 basic format
//! (`20240101T090000Z`). RFC 3339 is accepted as well so hand-written input
//! and other exporters work.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::TimestampError;

/// Timewarrior's basic UTC format.
const TIMEW_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Parses a Timewarrior or RFC 3339 timestamp into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TimestampError> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, TIMEW_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| TimestampError(s.to_string()))
}

/// Serde adapter for a required timestamp field.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(serde::de::Error::custom)
}

/// Serde adapter for an optional timestamp field.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse_timestamp(&s).map_err(serde::de::Error::custom))
        .transpose()
}
