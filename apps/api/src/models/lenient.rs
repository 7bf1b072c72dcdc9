//! Forgiving field decoders for user-supplied resume JSON.
//!
//! Editors in the wild send numbers where strings are expected, a single
//! string where a list is expected, and occasionally garbage entries in the
//! middle of an otherwise valid list. These helpers absorb all of that so
//! that decoding the canonical document never fails on shape alone.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Converts a scalar JSON value into its string form. Objects, arrays and
/// null yield `None`.
pub fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `Option<String>` that accepts any scalar.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_string))
}

/// `Vec<String>` that accepts an array of scalars or one bare scalar.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// A list section. Entries that fail to decode are dropped with a warning;
/// a non-array value yields an empty list.
pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(other) => {
            warn!("Expected a list section, found {}; ignoring it", kind_of(&other));
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<T>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Dropping malformed list entry at index {idx}: {e}");
                None
            }
        })
        .collect())
}

/// An object field that falls back to `T::default()` when the value is
/// missing or cannot be decoded.
pub fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        Some(v @ Value::Object(_)) => Ok(serde_json::from_value(v).unwrap_or_else(|e| {
            warn!("Malformed object field replaced by defaults: {e}");
            T::default()
        })),
        _ => Ok(T::default()),
    }
}

/// Optional size in points. Accepts `12`, `12.5`, `"12"`, `"12pt"` and
/// `"16px"` (pixels convert at 0.75pt/px).
pub fn opt_points<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f as f32),
        Some(Value::String(s)) => parse_points(&s),
        _ => None,
    })
}

pub fn parse_points(raw: &str) -> Option<f32> {
    let raw = raw.trim().to_ascii_lowercase();
    if let Some(px) = raw.strip_suffix("px") {
        return px.trim().parse::<f32>().ok().map(|v| v * 0.75);
    }
    raw.strip_suffix("pt")
        .unwrap_or(&raw)
        .trim()
        .parse::<f32>()
        .ok()
}

/// Non-empty string value of `key` in a JSON object.
pub fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
