//! Core query expansion types.
//!
//! This module contains the synonym table, tokenizer, field sets, the
//! query tree, and the compiler that ties them together.

pub mod compiler;
pub mod fields;
pub mod query;
pub mod synonyms;
pub mod tokenize;

pub use compiler::QueryCompiler;
pub use fields::{FieldSet, DEFAULT_FIELDS};
pub use query::{FieldSource, QueryNode};
pub use synonyms::{ExpansionSet, SynonymTable, DEFAULT_VOCABULARY};
pub use tokenize::{normalize, tokenize};
