//! Serde helpers for artifacts produced by the CSV converter, where every cell
//! arrives as a string ("-33.86") but hand-written files use real JSON types.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

/// Like [`string`], but `null` reads as an empty string. Blank CSV cells may
/// arrive either way.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::String(s)) => s,
        Some(StringOrNumber::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

pub(crate) fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("coordinate {n} is not representable"))),
        StringOrNumber::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid coordinate '{s}': {e}"))),
    }
}

/// Absent, null and empty labels all mean "unset".
pub(crate) fn optional_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<StringOrNumber>::deserialize(deserializer)?.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    });
    Ok(label.filter(|s| !s.trim().is_empty()))
}
