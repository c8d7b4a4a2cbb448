//! SQL `WHERE` clause renderer.
//!
//! Each leaf becomes a parameterized `ILIKE` with the term wrapped in `%`
//! wildcards. Terms are never interpolated into the SQL text. Dotted field
//! identifiers are quoted segment by segment (`"location"."city"`).

use serde::{Deserialize, Serialize};

use crate::backends::QueryRenderer;
use crate::core::QueryNode;
use crate::error::{ExpanseError, Result};

/// A rendered SQL predicate and its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlFilter {
    /// Predicate text using `$n` placeholders.
    pub clause: String,
    /// Parameter values, in placeholder order.
    pub params: Vec<String>,
}

/// Renders queries as PostgreSQL-style predicates.
#[derive(Debug, Clone)]
pub struct SqlRenderer {
    first_placeholder: usize,
}

impl Default for SqlRenderer {
    fn default() -> Self {
        Self {
            first_placeholder: 1,
        }
    }
}

impl SqlRenderer {
    /// Create a renderer numbering placeholders from `$1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number placeholders from `$start`, for merging with filters that
    /// already bind earlier parameters.
    pub fn starting_at(start: usize) -> Self {
        Self {
            first_placeholder: start.max(1),
        }
    }

    fn render_node(&self, node: &QueryNode, params: &mut Vec<String>) -> Result<String> {
        match node {
            QueryNode::And { clauses } => self.render_group(clauses, " AND ", "TRUE", params),
            QueryNode::Or { clauses } => self.render_group(clauses, " OR ", "FALSE", params),
            QueryNode::Contains { field, term } => {
                let column = quote_identifier(field)?;
                params.push(format!("%{}%", escape_like(term)));
                let placeholder = self
                    .first_placeholder
                    .checked_add(params.len() - 1)
                    .ok_or_else(|| {
                        ExpanseError::render(format!(
                            "placeholder numbering starting at ${} overflows",
                            self.first_placeholder
                        ))
                    })?;
                Ok(format!("{} ILIKE ${} ESCAPE '\\'", column, placeholder))
            }
        }
    }

    fn render_group(
        &self,
        clauses: &[QueryNode],
        separator: &str,
        empty: &str,
        params: &mut Vec<String>,
    ) -> Result<String> {
        match clauses {
            [] => Ok(empty.to_string()),
            [only] => self.render_node(only, params),
            _ => {
                let parts = clauses
                    .iter()
                    .map(|c| self.render_node(c, params))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("({})", parts.join(separator)))
            }
        }
    }
}

impl QueryRenderer for SqlRenderer {
    type Output = SqlFilter;

    fn render(&self, query: &QueryNode) -> Result<SqlFilter> {
        let mut params = Vec::new();
        let clause = self.render_node(query, &mut params)?;
        Ok(SqlFilter { clause, params })
    }

    fn name(&self) -> &'static str {
        "sql"
    }
}

/// Quote a dotted field identifier.
///
/// Only ASCII letters, digits, and underscores are accepted in each segment.
fn quote_identifier(field: &str) -> Result<String> {
    let segments: Vec<&str> = field.split('.').collect();
    let valid = segments.iter().all(|s| {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if !valid {
        return Err(ExpanseError::render(format!(
            "field identifier '{}' cannot be used as a SQL column",
            field
        )));
    }

    Ok(segments
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join("."))
}

/// Escape `LIKE` wildcards and the escape character itself.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
