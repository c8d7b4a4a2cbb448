//! Catalog listing documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::FieldSource;

/// A single catalog listing, kept as its raw JSON document.
///
/// Field identifiers are dotted paths into the document; a path that runs
/// through an array fans out over its elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Listing(Value);

impl Listing {
    /// Wrap a JSON document.
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// Listing identifier from `id` or `_id`, as text.
    pub fn id(&self) -> Option<String> {
        ["id", "_id"]
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(scalar_text)
    }

    /// Listing title, if present.
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    /// Numeric `price`, if present.
    pub fn price(&self) -> Option<f64> {
        self.0.get("price").and_then(Value::as_f64)
    }

    /// Text of the top-level string field `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl FieldSource for Listing {
    fn field_values(&self, field: &str) -> Vec<String> {
        let mut values = Vec::new();
        let segments: Vec<&str> = field.split('.').collect();
        collect_values(&self.0, &segments, &mut values);
        values
    }
}

fn collect_values(value: &Value, path: &[&str], out: &mut Vec<String>) {
    match (path, value) {
        (_, Value::Array(items)) => {
            for item in items {
                collect_values(item, path, out);
            }
        }
        ([], leaf) => out.extend(scalar_text(leaf)),
        ([head, rest @ ..], Value::Object(map)) => {
            if let Some(child) = map.get(*head) {
                collect_values(child, rest, out);
            }
        }
        _ => {}
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
