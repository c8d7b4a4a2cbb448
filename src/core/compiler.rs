//! Query compiler: raw search text to a [`QueryNode`].
//!
//! The pipeline is normalize → tokenize → deduplicate → expand → cross
//! with fields. Every token contributes one `Or` clause holding a
//! `Contains` leaf for each field × expansion term; the clauses are joined
//! with `And`. Input that yields no tokens compiles to the match-all query.
//!
//! Matching is substring-based and synonym relations are directional, so a
//! `men` leaf also matches text containing `women`.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::core::fields::FieldSet;
use crate::core::query::QueryNode;
use crate::core::synonyms::{ExpansionSet, SynonymTable};
use crate::core::tokenize::tokenize;
use crate::error::Result;

/// Compiles user search text against a shared synonym table.
///
/// Cloning is cheap; the table is shared. Compilation is pure, so one
/// compiler can serve any number of threads.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    synonyms: Arc<SynonymTable>,
    fields: FieldSet,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new(Arc::new(SynonymTable::default()), FieldSet::default())
    }
}

impl QueryCompiler {
    /// Create a compiler over `synonyms` searching `fields`.
    pub fn new(synonyms: Arc<SynonymTable>, fields: FieldSet) -> Self {
        Self { synonyms, fields }
    }

    /// Build a compiler from configuration (vocabulary and field list).
    pub fn from_config(config: &Config) -> Result<Self> {
        let synonyms = SynonymTable::from_config(&config.vocabulary)?;
        Ok(Self::new(Arc::new(synonyms), config.field_set()))
    }

    /// The synonym table in use.
    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// The default field set.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Normalized, deduplicated tokens of `raw`.
    pub fn tokens(&self, raw: &str) -> BTreeSet<String> {
        tokenize(raw)
    }

    /// Expansion set for a single already-normalized token.
    pub fn expansion(&self, token: &str) -> ExpansionSet {
        self.synonyms.expand(token)
    }

    /// Compile `raw` against the compiler's own field set.
    pub fn compile(&self, raw: &str) -> QueryNode {
        self.compile_with_fields(raw, &self.fields)
    }

    /// Compile `raw` against `fields` for this call only.
    pub fn compile_with_fields(&self, raw: &str, fields: &FieldSet) -> QueryNode {
        let tokens = tokenize(raw);
        if tokens.is_empty() {
            tracing::debug!("query has no tokens, compiling to match-all");
            return QueryNode::match_all();
        }

        let clauses: Vec<QueryNode> = tokens
            .iter()
            .map(|token| self.token_clause(token, fields))
            .collect();

        tracing::debug!(
            tokens = clauses.len(),
            fields = fields.len(),
            "compiled search query"
        );

        QueryNode::and(clauses)
    }

    /// Compile an untyped request value. Anything other than a string is
    /// treated as empty input.
    pub fn compile_value(&self, raw: &Value) -> QueryNode {
        match raw {
            Value::String(text) => self.compile(text),
            other => {
                tracing::debug!(kind = value_kind(other), "non-text query, compiling to match-all");
                QueryNode::match_all()
            }
        }
    }

    fn token_clause(&self, token: &str, fields: &FieldSet) -> QueryNode {
        let terms = self.synonyms.expand(token);
        let leaves = fields
            .iter()
            .flat_map(|field| {
                terms
                    .iter()
                    .map(move |term| QueryNode::contains(field, term.as_str()))
            })
            .collect();
        QueryNode::or(leaves)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
