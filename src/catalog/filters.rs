//! Structured catalog filters merged with the text query.

use serde::{Deserialize, Serialize};

use crate::catalog::Listing;

/// Exact-value filters applied alongside the compiled text query.
///
/// All set filters must hold. Category and gender compare
/// case-insensitively against the listing's top-level fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogFilters {
    /// Required category.
    pub category: Option<String>,
    /// Required gender.
    pub gender: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
}

impl CatalogFilters {
    /// Filters with no restrictions.
    pub fn all() -> Self {
        Self::default()
    }

    /// Set the category filter.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the gender filter.
    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Set the inclusive price range. Either bound may be open.
    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.gender.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Check if a listing passes these filters.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(ref category) = self.category {
            if !text_equals(listing.text("category"), category) {
                return false;
            }
        }

        if let Some(ref gender) = self.gender {
            if !text_equals(listing.text("gender"), gender) {
                return false;
            }
        }

        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = listing.price() else {
                return false;
            };
            if self.min_price.is_some_and(|min| price < min) {
                return false;
            }
            if self.max_price.is_some_and(|max| price > max) {
                return false;
            }
        }

        true
    }
}

fn text_equals(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case(expected.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> Listing {
        Listing::new(json!({
            "title": "Silk saree",
            "category": "Apparel",
            "gender": "Women",
            "price": 1200
        }))
    }

    #[test]
    fn test_empty_filters_match() {
        assert!(CatalogFilters::all().is_empty());
        assert!(CatalogFilters::all().matches(&listing()));
    }

    #[test]
    fn test_category_and_gender_case_insensitive() {
        let filters = CatalogFilters::all().category("apparel").gender("WOMEN");
        assert!(!filters.is_empty());
        assert!(filters.matches(&listing()));

        assert!(!CatalogFilters::all().category("jewellery").matches(&listing()));
        // Exact match, not substring: "men" must not pass for "Women"
        assert!(!CatalogFilters::all().gender("men").matches(&listing()));
    }

    #[test]
    fn test_price_range_inclusive() {
        assert!(CatalogFilters::all()
            .price_range(Some(1200.0), Some(1200.0))
            .matches(&listing()));
        assert!(CatalogFilters::all()
            .price_range(None, Some(1500.0))
            .matches(&listing()));
        assert!(!CatalogFilters::all()
            .price_range(Some(1500.0), None)
            .matches(&listing()));
        assert!(!CatalogFilters::all()
            .price_range(None, Some(999.0))
            .matches(&listing()));
    }

    #[test]
    fn test_price_bound_requires_price() {
        let no_price = Listing::new(json!({ "title": "Jhumka" }));
        assert!(!CatalogFilters::all()
            .price_range(Some(0.0), None)
            .matches(&no_price));
        assert!(CatalogFilters::all().matches(&no_price));
    }

    #[test]
    fn test_missing_category_fails_category_filter() {
        let bare = Listing::new(json!({ "title": "Clutch" }));
        assert!(!CatalogFilters::all().category("bags").matches(&bare));
    }
}
