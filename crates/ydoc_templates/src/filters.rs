//! Custom Tera filters available to fragments and override templates.

use std::collections::HashMap;

use tera::{Result, Value};

/// Escape a string for use inside a shields.io static badge path segment.
pub(crate) fn badge_escape(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Err(tera::Error::msg("badge_escape filter expects a scalar")),
    };
    let escaped = s.replace('-', "--").replace('_', "__").replace(' ', "_");
    Ok(Value::String(escaped))
}
