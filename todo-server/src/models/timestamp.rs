//! Wire format for todo timestamps
//!
//! Timestamps are local date-times (`2024-05-01T10:00:00`). Clients that
//! send an RFC 3339 value with an offset get it converted to UTC and the
//! offset dropped.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Parse a local date-time, falling back to RFC 3339 with an offset.
pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    s.parse::<NaiveDateTime>()
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.naive_utc()))
}

/// `deserialize_with` helper for optional timestamps; `null` is `None`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse(&s).map_err(|e| serde::de::Error::custom(format!("'{}': {}", s, e))))
        .transpose()
}
