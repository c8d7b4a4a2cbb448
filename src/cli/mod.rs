//! CLI commands for expanse.
//!
//! - **compile**: show the compiled query as a tree, SQL, or document filter
//! - **expand**: show per-token expansion sets
//! - **search**: run a query against a JSON listing catalog

pub mod compile;
pub mod expand;
pub mod search;

pub use compile::{CompileCommand, QueryFormat};
pub use expand::ExpandCommand;
pub use search::SearchCommand;
