//! Query renderers for storage backends.
//!
//! Renderers turn a compiled [`crate::core::QueryNode`] into a filter a
//! particular store understands:
//! - **SQL**: parameterized `ILIKE` predicates
//! - **Document**: JSON `$and`/`$or`/`$regex` filters

pub mod document;
pub mod sql;
pub mod traits;

pub use document::DocumentRenderer;
pub use sql::{SqlFilter, SqlRenderer};
pub use traits::QueryRenderer;
