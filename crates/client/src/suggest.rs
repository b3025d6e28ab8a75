//! Autocomplete value suggestions from a terms aggregation.
//!
//! Responsibilities:
//! - Build the terms aggregation for a field, with a server-side prefix filter
//!   for fields that support regex inclusion.
//! - Turn the returned buckets into a ranked, bounded suggestion list.
//!
//! Does NOT handle:
//! - Sending the request or degrading on failure (see [`crate::gateway`]).
//!
//! Invariants:
//! - At most [`MAX_VALUE_SUGGESTIONS`] values are returned.
//! - Numeric fields are ordered by value, everything else alphabetically.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};

use scope_config::constants::{MAX_VALUE_SUGGESTIONS, NUMERIC_TERMS_SIZE};

use crate::error::QueryError;

/// Aggregation name under which term buckets are requested and read back.
pub const TERMS_AGG: &str = "top_values";

/// Mapping types whose terms are suggested as numbers.
pub const NUMERIC_FIELD_TYPES: [&str; 8] = [
    "integer",
    "long",
    "float",
    "double",
    "short",
    "byte",
    "half_float",
    "scaled_float",
];

pub fn is_numeric_type(field_type: &str) -> bool {
    NUMERIC_FIELD_TYPES.contains(&field_type)
}

/// A value suggestion request for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuesRequest {
    pub index: String,
    pub field: String,
    /// Prefix typed so far.
    #[serde(default)]
    pub query: String,
    /// Mapping type of `field`; empty when unknown.
    #[serde(default, rename = "type")]
    pub field_type: String,
}

impl ValuesRequest {
    pub fn new(index: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.query = prefix.into();
        self
    }

    pub fn with_field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.index.trim().is_empty() {
            return Err(QueryError::MissingField("index"));
        }
        if self.field.trim().is_empty() {
            return Err(QueryError::MissingField("field"));
        }
        Ok(())
    }

    pub fn is_numeric(&self) -> bool {
        is_numeric_type(&self.field_type)
    }
}

/// One suggested value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Text(String),
}

impl FieldValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(_) => None,
        }
    }

    fn as_text(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

/// Escape every regex metacharacter so `prefix` matches literally.
///
/// Covers the usual JavaScript set plus the operators of the cluster's own
/// regex dialect (`"`, `#`, `@`, `&`, `<`, `>`, `~`).
pub fn escape_regex(prefix: &str) -> String {
    const META: &str = ".*+?^${}()|[]\\\"#@&<>~";

    let mut escaped = String::with_capacity(prefix.len() * 2);
    for ch in prefix.chars() {
        if META.contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Build the terms aggregation body for a request.
pub fn build_terms_body(request: &ValuesRequest) -> Value {
    let numeric = request.is_numeric();
    let size = if numeric {
        NUMERIC_TERMS_SIZE
    } else {
        MAX_VALUE_SUGGESTIONS
    };

    let mut terms = json!({ "field": request.field, "size": size });
    if !numeric && !request.query.is_empty() {
        terms["include"] = Value::from(format!("{}.*", escape_regex(&request.query)));
    }

    json!({ "size": 0, "aggs": { TERMS_AGG: { "terms": terms } } })
}

/// Rank the term buckets of a search response into suggestions.
pub fn suggestions_from_response(response: &Value, request: &ValuesRequest) -> Vec<FieldValue> {
    let buckets = response
        .pointer(&format!("/aggregations/{TERMS_AGG}/buckets"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let values = buckets.iter().filter_map(display_value);

    let mut values: Vec<FieldValue> = if request.is_numeric() {
        let mut numeric: Vec<FieldValue> = values
            .map(into_number)
            .filter(|v| v.as_text().starts_with(&request.query))
            .collect();
        numeric.sort_by(compare_numeric);
        numeric
    } else {
        let mut text: Vec<FieldValue> = values.collect();
        text.sort_by(compare_text);
        text
    };

    values.truncate(MAX_VALUE_SUGGESTIONS);
    values
}

/// The formatted form of a bucket when present, else its raw key.
fn display_value(bucket: &Value) -> Option<FieldValue> {
    if let Some(formatted) = bucket
        .get("key_as_string")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        return Some(FieldValue::Text(formatted.to_string()));
    }
    match bucket.get("key")? {
        Value::Number(n) => Some(FieldValue::Number(n.clone())),
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
        _ => None,
    }
}

/// Coerce a value to a JSON number, keeping integral values as integers.
fn into_number(value: FieldValue) -> FieldValue {
    let text = match value {
        FieldValue::Number(n) => return FieldValue::Number(integral(n)),
        FieldValue::Text(text) => text,
    };
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return FieldValue::Number(Number::from(int));
    }
    match trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => FieldValue::Number(integral(n)),
        None => FieldValue::Text(text),
    }
}

fn integral(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            Number::from(f as i64)
        }
        _ => n,
    }
}

/// Numbers ascending, then anything that failed to parse in text order.
fn compare_numeric(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_text(a, b),
    }
}

fn compare_text(a: &FieldValue, b: &FieldValue) -> Ordering {
    let (a, b) = (a.as_text(), b.as_text());
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(buckets: Value) -> Value {
        json!({ "aggregations": { "top_values": { "buckets": buckets } } })
    }

    fn numbers(values: &[FieldValue]) -> Vec<f64> {
        values.iter().filter_map(FieldValue::as_f64).collect()
    }

    #[test]
    fn test_numeric_values_sorted_by_value() {
        let request = ValuesRequest::new("logs", "status").with_field_type("long");
        let values = suggestions_from_response(
            &response(json!([{ "key": "500" }, { "key": "20" }, { "key": "5" }])),
            &request,
        );
        assert_eq!(
            values,
            vec![
                FieldValue::Number(5.into()),
                FieldValue::Number(20.into()),
                FieldValue::Number(500.into())
            ]
        );
        assert_eq!(serde_json::to_value(&values).unwrap(), json!([5, 20, 500]));
    }

    #[test]
    fn test_numeric_prefix_filtered_client_side() {
        let request = ValuesRequest::new("logs", "status")
            .with_field_type("integer")
            .with_prefix("4");
        let values = suggestions_from_response(
            &response(json!([
                { "key": 500 }, { "key": 404 }, { "key": 41 }, { "key": 200 }
            ])),
            &request,
        );
        assert_eq!(numbers(&values), vec![41.0, 404.0]);
    }

    #[test]
    fn test_numeric_floats_and_integral_floats() {
        let request = ValuesRequest::new("m", "latency").with_field_type("double");
        let values = suggestions_from_response(
            &response(json!([{ "key": 2.5 }, { "key": 3.0 }, { "key": 0.25 }])),
            &request,
        );
        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!([0.25, 2.5, 3])
        );
    }

    #[test]
    fn test_numeric_prefix_matches_emitted_form() {
        let buckets = json!([{ "key": 3.0 }, { "key": 30 }, { "key": 3.5 }, { "key": 13 }]);
        let request = ValuesRequest::new("m", "latency").with_field_type("double");

        let values =
            suggestions_from_response(&response(buckets.clone()), &request.clone().with_prefix("3"));
        assert_eq!(serde_json::to_value(&values).unwrap(), json!([3, 3.5, 30]));

        let values = suggestions_from_response(&response(buckets), &request.with_prefix("3."));
        assert_eq!(serde_json::to_value(&values).unwrap(), json!([3.5]));
    }

    #[test]
    fn test_numeric_truncated_to_twenty() {
        let buckets: Vec<Value> = (0..100).rev().map(|n| json!({ "key": n })).collect();
        let request = ValuesRequest::new("m", "n").with_field_type("long");
        let values = suggestions_from_response(&response(Value::from(buckets)), &request);
        assert_eq!(values.len(), 20);
        assert_eq!(values[0], FieldValue::Number(0.into()));
        assert_eq!(values[19], FieldValue::Number(19.into()));
    }

    #[test]
    fn test_text_values_sorted_alphabetically() {
        let request = ValuesRequest::new("logs", "host.name").with_field_type("keyword");
        let values = suggestions_from_response(
            &response(json!([
                { "key": "web-2" }, { "key": "Api" }, { "key": "db" }, { "key": "web-10" }
            ])),
            &request,
        );
        let text: Vec<String> = values.iter().map(FieldValue::as_text).collect();
        assert_eq!(text, vec!["Api", "db", "web-10", "web-2"]);
    }

    #[test]
    fn test_key_as_string_preferred() {
        let request = ValuesRequest::new("logs", "enabled").with_field_type("boolean");
        let values = suggestions_from_response(
            &response(json!([
                { "key": 1, "key_as_string": "true" },
                { "key": 0, "key_as_string": "false" }
            ])),
            &request,
        );
        assert_eq!(
            values,
            vec![
                FieldValue::Text("false".to_string()),
                FieldValue::Text("true".to_string())
            ]
        );
    }

    #[test]
    fn test_missing_aggregation_is_empty() {
        let request = ValuesRequest::new("logs", "host");
        assert!(suggestions_from_response(&json!({}), &request).is_empty());
    }

    #[test]
    fn test_terms_body_for_text_prefix() {
        let request = ValuesRequest::new("logs", "host").with_prefix("web.1");
        let body = build_terms_body(&request);
        assert_eq!(body["size"], 0);
        let terms = &body["aggs"]["top_values"]["terms"];
        assert_eq!(terms["field"], "host");
        assert_eq!(terms["size"], 20);
        assert_eq!(terms["include"], "web\\.1.*");
    }

    #[test]
    fn test_terms_body_without_prefix_has_no_include() {
        let body = build_terms_body(&ValuesRequest::new("logs", "host"));
        assert!(body["aggs"]["top_values"]["terms"].get("include").is_none());
    }

    #[test]
    fn test_terms_body_for_numeric_field() {
        let request = ValuesRequest::new("logs", "status")
            .with_field_type("short")
            .with_prefix("5");
        let terms = &build_terms_body(&request)["aggs"]["top_values"]["terms"];
        assert_eq!(terms["size"], 100);
        assert!(terms.get("include").is_none());
    }

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("plain"), "plain");
        assert_eq!(escape_regex("a.b*c"), "a\\.b\\*c");
        assert_eq!(escape_regex("(x|y)[z]"), "\\(x\\|y\\)\\[z\\]");
        assert_eq!(escape_regex("user@host"), "user\\@host");
        assert_eq!(escape_regex("c:\\"), "c:\\\\");
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            ValuesRequest::new("", "f").validate(),
            Err(QueryError::MissingField("index"))
        );
        assert_eq!(
            ValuesRequest::new("i", " ").validate(),
            Err(QueryError::MissingField("field"))
        );
        assert!(ValuesRequest::new("i", "f").validate().is_ok());
    }

    #[test]
    fn test_numeric_types() {
        assert!(is_numeric_type("scaled_float"));
        assert!(!is_numeric_type("keyword"));
        assert!(!is_numeric_type(""));
    }
}
