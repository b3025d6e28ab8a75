//! Response envelope normalization.
//!
//! The legacy client generation reports every response as
//! `{body, statusCode, headers, warnings}`; newer generations return the
//! payload directly. Every raw response goes through [`normalize`] before any
//! other processing so downstream code only ever sees the payload.

use serde_json::{Map, Value};

/// Unwrap a transport envelope, or return the payload unchanged.
///
/// An object is treated as an envelope when it has a `body` property and at
/// least one of `statusCode` or `headers` beside it.
pub fn normalize(raw: Value) -> Value {
    match raw {
        Value::Object(mut map) if is_envelope(&map) => map.remove("body").unwrap_or(Value::Null),
        other => other,
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.contains_key("body") && (map.contains_key("statusCode") || map.contains_key("headers"))
}

/// Build the legacy envelope around a payload.
pub(crate) fn envelope(
    body: Value,
    status: u16,
    headers: Map<String, Value>,
    warnings: Vec<String>,
) -> Value {
    let mut map = Map::new();
    map.insert("body".to_string(), body);
    map.insert("statusCode".to_string(), Value::from(status));
    map.insert("headers".to_string(), Value::Object(headers));
    let warnings = if warnings.is_empty() {
        Value::Null
    } else {
        Value::from(warnings)
    };
    map.insert("warnings".to_string(), warnings);
    Value::Object(map)
}
