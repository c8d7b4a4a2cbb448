//! Renderer trait for query backends.
//!
//! A renderer translates a compiled [`QueryNode`] into the native filter
//! syntax of one storage technology. The compiler never depends on a
//! renderer; callers pick the one matching their store.

use crate::core::QueryNode;
use crate::error::Result;

/// Translates a query tree into a backend-specific filter.
pub trait QueryRenderer: Send + Sync {
    /// The rendered filter type.
    type Output;

    /// Render `query`.
    ///
    /// Match-all (`And` with no clauses) must render as a filter that
    /// accepts every record; an `Or` with no clauses must accept none.
    fn render(&self, query: &QueryNode) -> Result<Self::Output>;

    /// Backend name for logging and CLI output.
    fn name(&self) -> &'static str;
}

/// Allow `&R` wherever a renderer is expected.
impl<R: QueryRenderer + ?Sized> QueryRenderer for &R {
    type Output = R::Output;

    fn render(&self, query: &QueryNode) -> Result<Self::Output> {
        (**self).render(query)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
