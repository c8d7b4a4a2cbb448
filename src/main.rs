//! expanse - synonym-driven query expansion for catalog search
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use expanse::catalog::{Catalog, CatalogFilters};
use expanse::cli::compile::{CompileCommand, CompileOptions, QueryFormat};
use expanse::cli::expand::{ExpandCommand, ExpandOptions};
use expanse::cli::search::{format_human_readable, SearchCommand, SearchOptions, SearchOutput};
use expanse::config::{expanse_home, CatalogConfig, Config, MIN_MAX_RESULTS};
use expanse::core::{FieldSet, QueryCompiler, SynonymTable};
use expanse::error::{exit_codes, FailOpen};
use expanse::logging;

// =============================================================================
// CLI Definition
// =============================================================================

/// expanse - synonym-driven query expansion for catalog search
#[derive(Parser)]
#[command(name = "expanse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a search string into a boolean query
    Compile {
        /// Search query
        query: String,
        /// Field to search (repeatable; defaults to configured fields)
        #[arg(long = "field", short = 'f')]
        fields: Vec<String>,
        /// Output representation
        #[arg(long, value_enum, default_value_t = FormatArg::Tree)]
        format: FormatArg,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the expansion set of each token
    Expand {
        /// Terms to expand
        #[arg(required = true)]
        terms: Vec<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Search a JSON listing catalog
    Search {
        /// Search query
        query: String,
        /// Catalog file (JSON array of listings)
        #[arg(long, short)]
        catalog: Option<PathBuf>,
        /// Required category
        #[arg(long)]
        category: Option<String>,
        /// Required gender
        #[arg(long)]
        gender: Option<String>,
        /// Minimum price (inclusive)
        #[arg(long)]
        min_price: Option<f64>,
        /// Maximum price (inclusive)
        #[arg(long)]
        max_price: Option<f64>,
        /// Maximum number of results (at least 1)
        #[arg(long, short, value_parser = parse_limit)]
        limit: Option<usize>,
        /// Field to search (repeatable; defaults to configured fields)
        #[arg(long = "field", short = 'f')]
        fields: Vec<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Tree,
    Sql,
    Document,
}

impl From<FormatArg> for QueryFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Tree => QueryFormat::Tree,
            FormatArg::Sql => QueryFormat::Sql,
            FormatArg::Document => QueryFormat::Document,
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("expanse error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, appends to `<expanse_home>/crash.log` and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("expanse panic: {}", info);

        if let Some(home) = expanse_home() {
            let _ = std::fs::create_dir_all(&home);
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(home.join("crash.log"))
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load();
    let compiler = build_compiler(&config);

    match cli.command {
        Commands::Compile {
            query,
            fields,
            format,
            json,
            quiet,
        } => run_compile(compiler, &query, fields, format, json, quiet),
        Commands::Expand { terms, json, quiet } => run_expand(compiler, &terms, json, quiet),
        Commands::Search {
            query,
            catalog,
            category,
            gender,
            min_price,
            max_price,
            limit,
            fields,
            json,
            quiet,
        } => {
            let mut filters = CatalogFilters::all().price_range(min_price, max_price);
            filters.category = category;
            filters.gender = gender;
            let options = SearchOptions {
                json,
                quiet,
                limit,
                fields: field_override(fields),
                filters,
            };
            run_search(compiler, config, &query, catalog, &options)
        }
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

/// Build the compiler from config, falling back to the built-in vocabulary
/// if the custom vocabulary cannot be loaded.
fn build_compiler(config: &Config) -> QueryCompiler {
    let fallback = QueryCompiler::new(Arc::new(SynonymTable::default()), config.field_set());
    QueryCompiler::from_config(config).fail_open_with("loading vocabulary", fallback)
}

/// Parse `--limit`, rejecting zero like `catalog.max_results` does.
fn parse_limit(value: &str) -> Result<usize, String> {
    let limit: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a positive integer", value))?;
    if CatalogConfig::is_valid_max_results(limit) {
        Ok(limit)
    } else {
        Err(format!("must be at least {}", MIN_MAX_RESULTS))
    }
}

fn field_override(fields: Vec<String>) -> Option<FieldSet> {
    if fields.is_empty() {
        None
    } else {
        Some(FieldSet::new(fields))
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn print_if_any(formatted: &str) {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
}

fn run_compile(
    compiler: QueryCompiler,
    query: &str,
    fields: Vec<String>,
    format: FormatArg,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = CompileCommand::new(compiler);
    let options = CompileOptions {
        json,
        quiet,
        format: format.into(),
        fields: field_override(fields),
    };

    let output = cmd.run(query, &options);
    print_if_any(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_expand(
    compiler: QueryCompiler,
    terms: &[String],
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = ExpandCommand::new(compiler);
    let options = ExpandOptions { json, quiet };

    let output = cmd.run(terms, &options);
    print_if_any(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_search(
    compiler: QueryCompiler,
    config: Config,
    query: &str,
    catalog_path: Option<PathBuf>,
    options: &SearchOptions,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let loaded = catalog_path
        .or_else(|| config.catalog.path.clone())
        .ok_or_else(|| "no catalog given; pass --catalog or set catalog.path".to_string())
        .and_then(|path| Catalog::load(&path).map_err(|e| e.to_string()));

    let catalog = match loaded {
        Ok(catalog) => catalog,
        Err(message) => {
            let output = SearchOutput::failure(query.trim(), message);
            if !options.quiet {
                if options.json {
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    eprint!("{}", format_human_readable(&output));
                }
            }
            return Ok(success_to_exit_code(false));
        }
    };

    let cmd = SearchCommand::new(compiler, catalog, config);
    let output = cmd.run(query, options);
    print_if_any(&cmd.format_output(&output, options));

    Ok(success_to_exit_code(output.success))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_to_exit_code() {
        assert_eq!(
            success_to_exit_code(true),
            ExitCode::from(exit_codes::SUCCESS as u8)
        );
        assert_eq!(
            success_to_exit_code(false),
            ExitCode::from(exit_codes::ERROR as u8)
        );
    }

    #[test]
    fn test_cli_parse_search() {
        let cli = Cli::parse_from([
            "expanse",
            "search",
            "red saree",
            "--catalog",
            "listings.json",
            "--limit",
            "5",
        ]);
        match cli.command {
            Commands::Search {
                query,
                catalog,
                limit,
                ..
            } => {
                assert_eq!(query, "red saree");
                assert_eq!(catalog, Some(PathBuf::from("listings.json")));
                assert_eq!(limit, Some(5));
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_limit() {
        assert!(Cli::try_parse_from(["expanse", "search", "red", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["expanse", "search", "red", "--limit", "-2"]).is_err());
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("1"), Ok(1));
        assert_eq!(parse_limit("0"), Err("must be at least 1".to_string()));
        assert!(parse_limit("ten").is_err());
    }
}
