//! Lenient readers over parsed model output.
//!
//! Models are asked for a schema but nothing guarantees it, so every reader falls back
//! instead of failing: wrong types and missing keys become defaults.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

static NULL: Value = Value::Null;

/// A string field. Numbers and booleans are stringified; `null`, blank and the literal
/// `"null"` count as absent.
pub fn opt_text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(as_text)
}

pub fn text(value: &Value, key: &str) -> String {
    opt_text(value, key).unwrap_or_default()
}

/// A list of strings. A bare string becomes a one-element list; non-text items are skipped.
pub fn text_list(value: &Value, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(as_text).collect(),
        Some(other) => as_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// The objects of an array field; anything else yields nothing.
pub fn objects<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|item| item.is_object())
}

/// A nested object, or `Value::Null` so further lookups fall through to defaults.
pub fn object<'a>(value: &'a Value, key: &str) -> &'a Value {
    value
        .get(key)
        .filter(|v| v.is_object())
        .unwrap_or(&NULL)
}

/// A non-negative integer given as a number or numeric string. Fractional values are
/// rejected rather than truncated.
pub fn opt_u32(value: &Value, key: &str) -> Option<u32> {
    match value.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn opt_bool(value: &Value, key: &str) -> Option<bool> {
    match value.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// A timestamp given as RFC 3339 or a bare `YYYY-MM-DD` date (taken as midnight UTC).
pub fn opt_datetime(value: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = opt_text(value, key)?;
    parse_datetime(&raw)
}

pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(text)
    }
}
