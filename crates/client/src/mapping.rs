//! Field mapping flattening.
//!
//! Turns the nested `properties` trees of one or more index mappings into a
//! flat list of leaf fields. Container nodes (declared or implicit `object`
//! type) are descended into but never reported themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type assumed for a mapping node that declares none.
const OBJECT_TYPE: &str = "object";

/// A leaf field of an index mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingField {
    /// Dot-joined path from the mapping root.
    #[serde(rename = "name")]
    pub path: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl MappingField {
    pub fn new(path: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            field_type: field_type.into(),
        }
    }

    /// Whether the field is reported as a leaf; always true for flattened output.
    pub fn is_leaf(&self) -> bool {
        self.field_type != OBJECT_TYPE
    }
}

/// Flatten one `properties` tree into sorted, deduplicated leaf fields.
pub fn flatten(properties: &Map<String, Value>) -> Vec<MappingField> {
    let mut fields = BTreeMap::new();
    collect(properties, "", &mut fields);
    into_sorted(fields)
}

/// Flatten every index of a get-mapping response.
///
/// The response maps index names to `{ mappings: { properties } }`. A path
/// present in several indices is reported once, with the type of the index
/// that sorts first.
pub fn fields_from_mapping_response(response: &Value) -> Vec<MappingField> {
    let mut fields = BTreeMap::new();
    if let Some(indices) = response.as_object() {
        for index in indices.values() {
            if let Some(properties) = index
                .pointer("/mappings/properties")
                .and_then(Value::as_object)
            {
                collect(properties, "", &mut fields);
            }
        }
    }
    into_sorted(fields)
}

fn collect(properties: &Map<String, Value>, parent: &str, out: &mut BTreeMap<String, String>) {
    for (key, node) in properties {
        let path = if parent.is_empty() {
            key.clone()
        } else {
            format!("{parent}.{key}")
        };
        let field_type = node
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(OBJECT_TYPE);

        if field_type != OBJECT_TYPE {
            out.entry(path.clone())
                .or_insert_with(|| field_type.to_string());
        }

        if let Some(children) = node.get("properties").and_then(Value::as_object) {
            collect(children, &path, out);
        }
    }
}

fn into_sorted(fields: BTreeMap<String, String>) -> Vec<MappingField> {
    fields
        .into_iter()
        .map(|(path, field_type)| MappingField { path, field_type })
        .collect()
}
