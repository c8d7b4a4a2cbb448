//! Search command for expanse.
//!
//! Compiles the query and runs it against an in-memory catalog together
//! with structured filters.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogFilters, Listing};
use crate::config::Config;
use crate::core::{FieldSet, QueryCompiler};

/// Options for the search command.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Maximum number of results (defaults to `catalog.max_results`).
    pub limit: Option<usize>,
    /// Fields to search instead of the configured ones.
    pub fields: Option<FieldSet>,
    /// Structured filters merged with the text query.
    pub filters: CatalogFilters,
}

/// Output format for the search command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutput {
    /// Whether the search was successful.
    pub success: bool,
    /// The search query used.
    pub query: String,
    /// True when the text query applied no filter.
    pub match_all: bool,
    /// Number of results returned.
    pub count: usize,
    /// The search results.
    pub results: Vec<SearchResultInfo>,
    /// Error message if search failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Simplified listing info for output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResultInfo {
    /// Listing ID.
    pub id: Option<String>,
    /// Listing title.
    pub title: Option<String>,
    /// Listing category.
    pub category: Option<String>,
    /// Listing price.
    pub price: Option<f64>,
}

impl From<&Listing> for SearchResultInfo {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id(),
            title: listing.title().map(str::to_string),
            category: listing.text("category").map(str::to_string),
            price: listing.price(),
        }
    }
}

impl SearchOutput {
    /// Create a successful output.
    pub fn success(
        query: impl Into<String>,
        match_all: bool,
        results: Vec<SearchResultInfo>,
    ) -> Self {
        Self {
            success: true,
            query: query.into(),
            match_all,
            count: results.len(),
            results,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            query: query.into(),
            match_all: false,
            count: 0,
            results: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The search command implementation.
pub struct SearchCommand {
    compiler: QueryCompiler,
    catalog: Catalog,
    config: Config,
}

impl SearchCommand {
    /// Create a new search command.
    pub fn new(compiler: QueryCompiler, catalog: Catalog, config: Config) -> Self {
        Self {
            compiler,
            catalog,
            config,
        }
    }

    /// Run the search command with the given query.
    pub fn run(&self, query: &str, options: &SearchOptions) -> SearchOutput {
        let fields = options
            .fields
            .clone()
            .unwrap_or_else(|| self.compiler.fields().clone());
        let tree = self.compiler.compile_with_fields(query, &fields);
        let limit = options.limit.unwrap_or(self.config.catalog.max_results);

        let results: Vec<SearchResultInfo> = self
            .catalog
            .search(&tree, &options.filters, Some(limit))
            .into_iter()
            .map(SearchResultInfo::from)
            .collect();

        tracing::debug!(
            query,
            results = results.len(),
            catalog = self.catalog.len(),
            "catalog search complete"
        );

        SearchOutput::success(query.trim(), tree.is_match_all(), results)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SearchOutput, options: &SearchOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            format_human_readable(output)
        }
    }
}

/// Format search output as human-readable text.
pub fn format_human_readable(output: &SearchOutput) -> String {
    if !output.success {
        return format!(
            "Search failed: {}\n",
            output.error.as_deref().unwrap_or("unknown error")
        );
    }

    if output.results.is_empty() {
        return format!("No listings found for query: \"{}\"\n", output.query);
    }

    let mut lines = Vec::new();
    if output.match_all {
        lines.push(format!("Showing {} listing(s) (no text filter)\n", output.count));
    } else {
        lines.push(format!(
            "Found {} listing(s) for query: \"{}\"\n",
            output.count, output.query
        ));
    }

    for (i, result) in output.results.iter().enumerate() {
        let title = result.title.as_deref().unwrap_or("(untitled)");
        let mut line = format!("{}. {}", i + 1, title);
        if let Some(ref category) = result.category {
            line.push_str(&format!(" [{}]", category));
        }
        if let Some(price) = result.price {
            line.push_str(&format!(" - {:.2}", price));
        }
        lines.push(line);
        if let Some(ref id) = result.id {
            lines.push(format!("   ID: {}", id));
        }
    }

    lines.join("\n")
}
