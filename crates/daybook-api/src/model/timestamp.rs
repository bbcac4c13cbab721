//! Serde helpers for backend timestamps.
//!
//! The backend is inconsistent about time formats: entity columns come back
//! as `YYYY-MM-DD HH:MM:SS` wall-clock strings, some endpoints send RFC 3339,
//! and a few send epoch milliseconds. Everything is normalised to a local
//! wall-clock [`NaiveDateTime`].

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

/// Wire format used when serialising.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a backend timestamp string.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339.
/// Zoned values are converted to local time.
#[must_use]
pub fn parse(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(s, FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Converts epoch milliseconds to a local wall-clock time.
#[must_use]
pub fn from_millis(ms: i64) -> Option<NaiveDateTime> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.naive_local())
}

struct TimestampVisitor;

impl Visitor<'_> for TimestampVisitor {
    type Value = NaiveDateTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a date-time string or epoch milliseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse(v).ok_or_else(|| E::custom(format!("invalid timestamp: {v}")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        from_millis(v).ok_or_else(|| E::custom(format!("invalid epoch millis: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let ms = i64::try_from(v).map_err(E::custom)?;
        self.visit_i64(ms)
    }
}

/// Serialises as `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
///
/// Returns the serializer's error.
#[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde with= signature
pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.format(FORMAT).to_string())
}

/// Deserialises any supported timestamp format.
///
/// # Errors
///
/// Returns an error if the value is not a recognised timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TimestampVisitor)
}

/// Same as the parent module, for optional fields.
pub mod option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialises `Some` as a timestamp string and `None` as null.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    #[allow(clippy::ref_option)] // Required by serde with= signature
    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => super::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialises null, empty strings and timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty value is not a recognised timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
        match raw {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(serde_json::Value::String(s)) => super::parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
            Some(serde_json::Value::Number(n)) => n
                .as_i64()
                .and_then(super::from_millis)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid epoch millis: {n}"))),
            Some(other) => Err(serde::de::Error::custom(format!(
                "invalid timestamp: {other}"
            ))),
        }
    }
}
