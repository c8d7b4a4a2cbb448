//! Expand command for expanse.
//!
//! Shows the expansion set each token of the input would search for.

use serde::{Deserialize, Serialize};

use crate::core::QueryCompiler;

/// Options for the expand command.
#[derive(Debug, Clone, Default)]
pub struct ExpandOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Expansion of a single token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpansionInfo {
    /// The normalized token.
    pub token: String,
    /// Whether the vocabulary has an entry for the token.
    pub known: bool,
    /// The token plus its variants.
    pub terms: Vec<String>,
}

/// Output format for the expand command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandOutput {
    /// Always true; expansion cannot fail.
    pub success: bool,
    /// Expansions in token order.
    pub expansions: Vec<ExpansionInfo>,
}

/// The expand command implementation.
pub struct ExpandCommand {
    compiler: QueryCompiler,
}

impl ExpandCommand {
    /// Create a new expand command.
    pub fn new(compiler: QueryCompiler) -> Self {
        Self { compiler }
    }

    /// Expand every token found in `inputs`.
    pub fn run(&self, inputs: &[String], _options: &ExpandOptions) -> ExpandOutput {
        let expansions = self
            .compiler
            .tokens(&inputs.join(" "))
            .into_iter()
            .map(|token| ExpansionInfo {
                known: self.compiler.synonyms().contains(&token),
                terms: self.compiler.expansion(&token).into_iter().collect(),
                token,
            })
            .collect();

        ExpandOutput {
            success: true,
            expansions,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ExpandOutput, options: &ExpandOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        if output.expansions.is_empty() {
            return "No searchable tokens.\n".to_string();
        }

        output
            .expansions
            .iter()
            .map(|e| {
                if e.known {
                    format!("{} -> {}", e.token, e.terms.join(", "))
                } else {
                    format!("{} -> {} (no synonyms)", e.token, e.token)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_expand_known_and_unknown() {
        let cmd = ExpandCommand::new(QueryCompiler::default());
        let output = cmd.run(&args(&["Boy", "zardozi"]), &ExpandOptions::default());

        assert!(output.success);
        assert_eq!(output.expansions.len(), 2);
        assert_eq!(output.expansions[0].token, "boy");
        assert!(output.expansions[0].known);
        assert_eq!(output.expansions[0].terms, vec!["boy", "boys", "male", "men"]);
        assert!(!output.expansions[1].known);
        assert_eq!(output.expansions[1].terms, vec!["zardozi"]);
    }

    #[test]
    fn test_expand_tokenizes_and_dedups() {
        let cmd = ExpandCommand::new(QueryCompiler::default());
        let output = cmd.run(&args(&["men's", "MEN"]), &ExpandOptions::default());
        let tokens: Vec<&str> = output.expansions.iter().map(|e| e.token.as_str()).collect();
        assert_eq!(tokens, vec!["men", "s"]);
    }

    #[test]
    fn test_format_human_readable() {
        let cmd = ExpandCommand::new(QueryCompiler::default());
        let options = ExpandOptions::default();
        let text = cmd.format_output(&cmd.run(&args(&["red", "xyz"]), &options), &options);
        assert!(text.contains("red -> burgundy, crimson, maroon, red, ruby"));
        assert!(text.contains("xyz -> xyz (no synonyms)"));
    }

    #[test]
    fn test_format_empty() {
        let cmd = ExpandCommand::new(QueryCompiler::default());
        let options = ExpandOptions::default();
        let text = cmd.format_output(&cmd.run(&args(&["!!"]), &options), &options);
        assert_eq!(text, "No searchable tokens.\n");
    }

    #[test]
    fn test_format_json() {
        let cmd = ExpandCommand::new(QueryCompiler::default());
        let options = ExpandOptions {
            json: true,
            ..Default::default()
        };
        let text = cmd.format_output(&cmd.run(&args(&["bag"]), &options), &options);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["expansions"][0]["token"], "bag");
        assert_eq!(parsed["expansions"][0]["known"], true);
    }
}
