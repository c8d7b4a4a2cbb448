//! In-memory listing catalog.
//!
//! The catalog evaluates a compiled [`QueryNode`] as a predicate and merges
//! it with structured [`CatalogFilters`], the way a catalog search endpoint
//! combines free text with category, gender, and price selections.

pub mod filters;
pub mod listing;

use std::path::Path;

use serde_json::Value;

use crate::core::QueryNode;
use crate::error::{ExpanseError, Result};
use crate::util::read_to_string_limited;

pub use filters::CatalogFilters;
pub use listing::Listing;

/// An ordered collection of listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    listings: Vec<Listing>,
}

impl Catalog {
    /// Create a catalog from listings.
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Parse a JSON array of listing objects.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the document is not valid JSON, is
    /// not an array, or contains a non-object element.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content)?;
        let Value::Array(items) = document else {
            return Err(ExpanseError::serde("catalog must be a JSON array of listings"));
        };

        let listings = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                if item.is_object() {
                    Ok(Listing::new(item))
                } else {
                    Err(ExpanseError::serde(format!(
                        "catalog entry {} is not an object",
                        index
                    )))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(listings))
    }

    /// Load a catalog file (size-limited).
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_to_string_limited(path)?;
        let catalog = Self::from_json_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            listings = catalog.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the catalog holds no listings.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// All listings in catalog order.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Listings matching both the text query and the filters, in catalog
    /// order, at most `limit` of them.
    pub fn search(
        &self,
        query: &QueryNode,
        filters: &CatalogFilters,
        limit: Option<usize>,
    ) -> Vec<&Listing> {
        let unfiltered = filters.is_empty();
        let matched = self.listings.iter().filter(move |listing| {
            (unfiltered || filters.matches(listing)) && query.matches(*listing)
        });

        match limit {
            Some(limit) => matched.take(limit).collect(),
            None => matched.collect(),
        }
    }
}
