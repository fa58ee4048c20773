//! Generic field-to-text conversion.
//!
//! Custom fields arrive as whatever the field type dictates: plain strings,
//! rich-text documents, arrays of option values, numbers. Everything is
//! flattened to a string suitable for a prompt.

use crate::document::{render_to_text, Document};
use serde_json::Value;

/// Convert any field value to plain text.
pub fn field_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(values) => values
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) if is_document(map) => Document::from_value(value).render(),
        Value::Object(_) => value.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

/// Render an issue description.
///
/// The v3 API returns a document; the legacy v2 API returns wiki text, which
/// is passed through as-is.
pub fn description_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        other => render_to_text(other),
    }
}

fn is_document(map: &serde_json::Map<String, Value>) -> bool {
    map.contains_key("content") || map.get("type").and_then(Value::as_str) == Some("doc")
}
