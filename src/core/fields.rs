//! Searchable field identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fields searched by default, matching the listing documents in the catalog.
///
/// Dotted identifiers address nested values (`location.city`).
pub const DEFAULT_FIELDS: &[&str] = &[
    "title",
    "description",
    "gender",
    "category",
    "subcategory",
    "size",
    "location.city",
    "addressLine",
];

/// Ordered list of field identifiers a query is compiled against.
///
/// Order is preserved so compiled queries are stable. Duplicates are
/// dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(Vec<String>);

impl Default for FieldSet {
    fn default() -> Self {
        Self::new(DEFAULT_FIELDS.iter().copied())
    }
}

impl FieldSet {
    /// Create a field set, keeping the first occurrence of each identifier.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        Self(unique)
    }

    /// Parse a comma-separated list such as `"title, category"`.
    ///
    /// Blank segments are ignored.
    pub fn parse_list(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    /// Field identifiers in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field identifiers as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fields() {
        let fields = FieldSet::default();
        assert_eq!(
            fields.iter().collect::<Vec<_>>(),
            vec![
                "title",
                "description",
                "gender",
                "category",
                "subcategory",
                "size",
                "location.city",
                "addressLine",
            ]
        );
    }

    #[test]
    fn test_new_drops_duplicates_keeping_order() {
        let fields = FieldSet::new(["title", "category", "title"]);
        assert_eq!(fields.as_slice(), &["title", "category"]);
    }

    #[test]
    fn test_parse_list() {
        let fields = FieldSet::parse_list(" title , category,,size ");
        assert_eq!(fields.as_slice(), &["title", "category", "size"]);
        assert!(FieldSet::parse_list(" , ").is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldSet::new(["title", "size"]).to_string(), "title, size");
    }

    #[test]
    fn test_serde_transparent() {
        let fields: FieldSet = serde_json::from_str(r#"["title","city"]"#).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(serde_json::to_string(&fields).unwrap(), r#"["title","city"]"#);
    }
}
