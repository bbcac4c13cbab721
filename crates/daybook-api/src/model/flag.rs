//! Lenient boolean fields.
//!
//! Flags such as `is_top` and `is_vip` arrive as `true`/`false`, `0`/`1`,
//! or occasionally `"0"`/`"1"` depending on the endpoint.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl RawFlag {
    fn truthy(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Int(i) => i != 0,
            Self::Text(s) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
        }
    }
}

/// Deserialises a required flag; null counts as false.
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawFlag>::deserialize(deserializer)?.is_some_and(RawFlag::truthy))
}

/// Deserialises an optional flag.
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawFlag>::deserialize(deserializer)?.map(RawFlag::truthy))
}
