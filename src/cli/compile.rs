//! Compile command for expanse.
//!
//! Compiles a search string and prints the query tree, a SQL predicate, or
//! a document-store filter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backends::{DocumentRenderer, QueryRenderer, SqlFilter, SqlRenderer};
use crate::core::{FieldSet, QueryCompiler, QueryNode};

/// Output representation for a compiled query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryFormat {
    /// The storage-agnostic query tree.
    #[default]
    Tree,
    /// A parameterized SQL predicate.
    Sql,
    /// A JSON document-store filter.
    Document,
}

/// Options for the compile command.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Representation to produce.
    pub format: QueryFormat,
    /// Fields to search instead of the configured ones.
    pub fields: Option<FieldSet>,
}

/// One conjunctive clause, described by the token that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClauseInfo {
    /// The normalized token.
    pub token: String,
    /// The token's expansion set.
    pub terms: Vec<String>,
    /// Number of field × term pairs in the clause.
    pub pairs: usize,
}

/// Output format for the compile command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileOutput {
    /// Whether compilation and rendering succeeded.
    pub success: bool,
    /// The raw query text.
    pub query: String,
    /// Fields the query was compiled against.
    pub fields: FieldSet,
    /// True when the query applies no text filter.
    pub match_all: bool,
    /// Per-token clauses.
    pub clauses: Vec<ClauseInfo>,
    /// Requested representation.
    pub format: QueryFormat,
    /// The query tree (tree format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<QueryNode>,
    /// The SQL predicate (sql format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<SqlFilter>,
    /// The document filter (document format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Value>,
    /// Error message if rendering failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The compile command implementation.
pub struct CompileCommand {
    compiler: QueryCompiler,
}

impl CompileCommand {
    /// Create a new compile command.
    pub fn new(compiler: QueryCompiler) -> Self {
        Self { compiler }
    }

    /// Compile `query` and render it in the requested format.
    pub fn run(&self, query: &str, options: &CompileOptions) -> CompileOutput {
        let fields = options
            .fields
            .clone()
            .unwrap_or_else(|| self.compiler.fields().clone());
        let tree = self.compiler.compile_with_fields(query, &fields);

        let clauses = self
            .compiler
            .tokens(query)
            .into_iter()
            .zip(tree.clauses())
            .map(|(token, clause)| ClauseInfo {
                terms: self.compiler.expansion(&token).into_iter().collect(),
                pairs: clause.pairs().len(),
                token,
            })
            .collect();

        let mut output = CompileOutput {
            success: true,
            query: query.to_string(),
            fields,
            match_all: tree.is_match_all(),
            clauses,
            format: options.format,
            tree: None,
            sql: None,
            document: None,
            error: None,
        };

        match options.format {
            QueryFormat::Tree => output.tree = Some(tree),
            QueryFormat::Sql => match SqlRenderer::new().render(&tree) {
                Ok(filter) => output.sql = Some(filter),
                Err(e) => {
                    output.success = false;
                    output.error = Some(e.to_string());
                }
            },
            QueryFormat::Document => match DocumentRenderer::new().render(&tree) {
                Ok(filter) => output.document = Some(filter),
                Err(e) => {
                    output.success = false;
                    output.error = Some(e.to_string());
                }
            },
        }

        output
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &CompileOutput, options: &CompileOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &CompileOutput) -> String {
        if !output.success {
            return format!(
                "Compile failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();

        if output.match_all {
            lines.push(format!(
                "No searchable tokens in \"{}\"; no text filter applies.",
                output.query
            ));
        } else {
            lines.push(format!(
                "Compiled \"{}\" into {} clause(s) over {} field(s): {}",
                output.query,
                output.clauses.len(),
                output.fields.len(),
                output.fields
            ));
            lines.push(String::new());
            for (i, clause) in output.clauses.iter().enumerate() {
                lines.push(format!(
                    "{}. {} -> {} ({} pairs)",
                    i + 1,
                    clause.token,
                    clause.terms.join(", "),
                    clause.pairs
                ));
            }
        }

        if let Some(ref sql) = output.sql {
            lines.push(String::new());
            lines.push(format!("WHERE {}", sql.clause));
            for (i, param) in sql.params.iter().enumerate() {
                lines.push(format!("  ${} = '{}'", i + 1, param));
            }
        }

        if let Some(ref document) = output.document {
            lines.push(String::new());
            lines.push(serde_json::to_string_pretty(document).unwrap_or_else(|_| "{}".to_string()));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SynonymTable;
    use std::sync::Arc;

    fn command() -> CompileCommand {
        let table = SynonymTable::from_entries([("boy", ["men", "male", "boys"])]);
        CompileCommand::new(QueryCompiler::new(
            Arc::new(table),
            FieldSet::new(["title", "category"]),
        ))
    }

    #[test]
    fn test_tree_output() {
        let output = command().run("Boy's kurta", &CompileOptions::default());

        assert!(output.success);
        assert!(!output.match_all);
        assert_eq!(output.format, QueryFormat::Tree);
        assert!(output.tree.is_some());

        let tokens: Vec<&str> = output.clauses.iter().map(|c| c.token.as_str()).collect();
        assert_eq!(tokens, vec!["boy", "kurta", "s"]);
        assert_eq!(output.clauses[0].terms, vec!["boy", "boys", "male", "men"]);
        assert_eq!(output.clauses[0].pairs, 8);
        assert_eq!(output.clauses[1].pairs, 2);
    }

    #[test]
    fn test_fields_override() {
        let options = CompileOptions {
            fields: Some(FieldSet::new(["title"])),
            ..Default::default()
        };
        let output = command().run("boy", &options);
        assert_eq!(output.fields, FieldSet::new(["title"]));
        assert_eq!(output.clauses[0].pairs, 4);
    }

    #[test]
    fn test_match_all_output() {
        let cmd = command();
        let options = CompileOptions::default();
        let output = cmd.run("?!", &options);

        assert!(output.success);
        assert!(output.match_all);
        assert!(output.clauses.is_empty());
        assert!(cmd
            .format_output(&output, &options)
            .contains("no text filter applies"));
    }

    #[test]
    fn test_sql_output() {
        let options = CompileOptions {
            format: QueryFormat::Sql,
            ..Default::default()
        };
        let output = command().run("kurta", &options);
        let sql = output.sql.expect("sql output");
        assert_eq!(sql.params, vec!["%kurta%", "%kurta%"]);
        assert!(output.tree.is_none());
    }

    #[test]
    fn test_sql_render_failure_reported() {
        let options = CompileOptions {
            format: QueryFormat::Sql,
            fields: Some(FieldSet::new(["title; --"])),
            ..Default::default()
        };
        let cmd = command();
        let output = cmd.run("kurta", &options);
        assert!(!output.success);
        assert!(output.error.is_some());
        assert!(cmd.format_output(&output, &options).starts_with("Compile failed"));
    }

    #[test]
    fn test_document_output() {
        let options = CompileOptions {
            format: QueryFormat::Document,
            ..Default::default()
        };
        let output = command().run("", &options);
        assert_eq!(output.document, Some(serde_json::json!({})));
    }

    #[test]
    fn test_format_quiet_and_json() {
        let cmd = command();
        let output = cmd.run("boy", &CompileOptions::default());

        let quiet = CompileOptions {
            quiet: true,
            ..Default::default()
        };
        assert!(cmd.format_output(&output, &quiet).is_empty());

        let json = CompileOptions {
            json: true,
            ..Default::default()
        };
        let parsed: Value = serde_json::from_str(&cmd.format_output(&output, &json)).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["format"], "tree");
        assert_eq!(parsed["tree"]["op"], "and");
        assert!(parsed.get("sql").is_none());
    }

    #[test]
    fn test_human_readable_lists_clauses() {
        let cmd = command();
        let options = CompileOptions::default();
        let text = cmd.format_output(&cmd.run("boy", &options), &options);
        assert!(text.contains("into 1 clause(s) over 2 field(s): title, category"));
        assert!(text.contains("1. boy -> boy, boys, male, men (8 pairs)"));
    }
}
