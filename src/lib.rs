//! expanse - synonym-driven query expansion for catalog search
//!
//! expanse turns a free-text search such as `"red silk saree"` into a
//! boolean query: one clause per distinct token, each clause an OR over
//! every searchable field crossed with the token's synonyms. The query tree
//! is storage-agnostic; renderers translate it to SQL or document-store
//! filters, and the in-memory catalog evaluates it directly.

pub mod backends;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod util;

pub use backends::{DocumentRenderer, QueryRenderer, SqlFilter, SqlRenderer};
pub use catalog::{Catalog, CatalogFilters, Listing};
pub use config::Config;
pub use crate::core::{
    normalize, tokenize, ExpansionSet, FieldSet, FieldSource, QueryCompiler, QueryNode,
    SynonymTable, DEFAULT_FIELDS, DEFAULT_VOCABULARY,
};
pub use error::{ExpanseError, Result};

// CLI commands
pub use cli::{CompileCommand, ExpandCommand, QueryFormat, SearchCommand};
