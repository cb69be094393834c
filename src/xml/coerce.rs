//! Text-to-value coercion rules
//!
//! XML text content carries no type information, so values are sniffed by
//! lexical shape. The rule chain is ordered and shared by every extraction
//! site (records, items, config entries, CSV cells) instead of being
//! duplicated inline at each one.

use serde_json::{Number, Value};

/// Coerce element text using the full rule chain:
/// try-numeric, try-boolean, else trimmed text.
pub fn scalar(raw: &str) -> Value {
    let text = raw.trim();

    if let Some(number) = try_number(text) {
        return Value::Number(number);
    }
    if let Some(flag) = try_bool(text) {
        return Value::Bool(flag);
    }

    Value::String(text.to_string())
}

/// Coerce a config entry. Values that look like embedded JSON (leading
/// `{` or `[`) are parsed as such, falling back to the raw text when the
/// payload is malformed; everything else goes through the scalar chain.
pub fn config_value(raw: &str) -> Value {
    let text = raw.trim();

    if text.starts_with('{') || text.starts_with('[') {
        return match serde_json::from_str(text) {
            Ok(value) => value,
            Err(_) => Value::String(text.to_string()),
        };
    }

    scalar(text)
}

/// Coerce a CSV cell: numeric when fully numeric, else text.
/// Booleans are deliberately not sniffed here, matching the CSV branch of
/// the original format.
pub fn csv_cell(raw: &str) -> Value {
    let text = raw.trim();

    if let Some(number) = try_number(text) {
        return Value::Number(number);
    }

    Value::String(text.to_string())
}

fn try_number(text: &str) -> Option<Number> {
    if text.is_empty() {
        return None;
    }
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Number::from(integer));
    }
    if let Ok(float) = text.parse::<f64>() {
        if float.is_finite() {
            return Number::from_f64(float);
        }
    }
    None
}

fn try_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
