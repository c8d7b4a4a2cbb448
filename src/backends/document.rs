//! Document-store filter renderer.
//!
//! Produces MongoDB-style JSON filters: `$and`/`$or` for the tree nodes and
//! a case-insensitive `$regex` for each leaf. Terms are regex-escaped, so a
//! leaf is a literal substring test.

use serde_json::{json, Value};

use crate::backends::QueryRenderer;
use crate::core::QueryNode;
use crate::error::Result;

/// Renders queries as JSON document filters.
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer;

impl DocumentRenderer {
    /// Create a document renderer.
    pub fn new() -> Self {
        Self
    }

    fn render_node(&self, node: &QueryNode) -> Value {
        match node {
            QueryNode::And { clauses } => match clauses.as_slice() {
                [] => json!({}),
                [only] => self.render_node(only),
                _ => {
                    let rendered: Vec<Value> = clauses.iter().map(|c| self.render_node(c)).collect();
                    json!({ "$and": rendered })
                }
            },
            QueryNode::Or { clauses } => match clauses.as_slice() {
                // `$or` rejects an empty array; `$nor: [{}]` matches no document
                [] => json!({ "$nor": [{}] }),
                [only] => self.render_node(only),
                _ => {
                    let rendered: Vec<Value> = clauses.iter().map(|c| self.render_node(c)).collect();
                    json!({ "$or": rendered })
                }
            },
            QueryNode::Contains { field, term } => {
                let mut leaf = serde_json::Map::new();
                leaf.insert(
                    field.clone(),
                    json!({ "$regex": regex::escape(term), "$options": "i" }),
                );
                Value::Object(leaf)
            }
        }
    }
}

impl QueryRenderer for DocumentRenderer {
    type Output = Value;

    fn render(&self, query: &QueryNode) -> Result<Value> {
        Ok(self.render_node(query))
    }

    fn name(&self) -> &'static str {
        "document"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldSet, QueryCompiler, SynonymTable};
    use std::sync::Arc;

    #[test]
    fn test_match_all_renders_empty_filter() {
        let filter = DocumentRenderer::new().render(&QueryNode::match_all()).unwrap();
        assert_eq!(filter, json!({}));
    }

    #[test]
    fn test_empty_or_matches_nothing() {
        let filter = DocumentRenderer::new()
            .render(&QueryNode::match_nothing())
            .unwrap();
        assert_eq!(filter, json!({ "$nor": [{}] }));
    }

    #[test]
    fn test_compiled_query() {
        let table = SynonymTable::from_entries([("boy", ["men"])]);
        let compiler = QueryCompiler::new(
            Arc::new(table),
            FieldSet::new(["title", "location.city"]),
        );
        let filter = DocumentRenderer::new()
            .render(&compiler.compile("boy pune"))
            .unwrap();

        assert_eq!(
            filter,
            json!({
                "$and": [
                    { "$or": [
                        { "title": { "$regex": "boy", "$options": "i" } },
                        { "title": { "$regex": "men", "$options": "i" } },
                        { "location.city": { "$regex": "boy", "$options": "i" } },
                        { "location.city": { "$regex": "men", "$options": "i" } }
                    ]},
                    { "$or": [
                        { "title": { "$regex": "pune", "$options": "i" } },
                        { "location.city": { "$regex": "pune", "$options": "i" } }
                    ]}
                ]
            })
        );
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        let filter = DocumentRenderer::new()
            .render(&QueryNode::contains("title", "a+b(c)"))
            .unwrap();
        assert_eq!(filter["title"]["$regex"], json!("a\\+b\\(c\\)"));
    }
}
