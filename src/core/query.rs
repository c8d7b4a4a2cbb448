//! Storage-agnostic boolean query tree.
//!
//! Compiled queries are always a conjunction of per-token disjunctions over
//! `(field, term)` leaves. Backends translate the tree into their own filter
//! syntax; [`QueryNode::matches`] evaluates it in memory.

use serde::{Deserialize, Serialize};

/// A node in a compiled query.
///
/// `And` with no clauses matches everything. `Or` with no clauses matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QueryNode {
    /// Every clause must match.
    And { clauses: Vec<QueryNode> },
    /// At least one clause must match.
    Or { clauses: Vec<QueryNode> },
    /// `field` contains `term`, case-insensitively, anywhere in its text.
    Contains { field: String, term: String },
}

/// Read access to a record's field values for in-memory evaluation.
pub trait FieldSource {
    /// Text values stored under `field`. Missing fields yield no values.
    fn field_values(&self, field: &str) -> Vec<String>;
}

impl QueryNode {
    /// The canonical "no textual filter" query.
    pub fn match_all() -> Self {
        Self::And {
            clauses: Vec::new(),
        }
    }

    /// A disjunction with no alternatives; never matches.
    pub fn match_nothing() -> Self {
        Self::Or {
            clauses: Vec::new(),
        }
    }

    /// Create a conjunction.
    pub fn and(clauses: Vec<QueryNode>) -> Self {
        Self::And { clauses }
    }

    /// Create a disjunction.
    pub fn or(clauses: Vec<QueryNode>) -> Self {
        Self::Or { clauses }
    }

    /// Create a substring leaf.
    pub fn contains(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            term: term.into(),
        }
    }

    /// Whether this is the match-all query (`And` with no clauses).
    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::And { clauses } if clauses.is_empty())
    }

    /// Top-level clauses of a conjunction; empty for other nodes.
    pub fn clauses(&self) -> &[QueryNode] {
        match self {
            Self::And { clauses } => clauses,
            _ => &[],
        }
    }

    /// All `(field, term)` pairs in this subtree, in tree order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        self.collect_pairs(&mut pairs);
        pairs
    }

    fn collect_pairs<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Self::And { clauses } | Self::Or { clauses } => {
                for clause in clauses {
                    clause.collect_pairs(out);
                }
            }
            Self::Contains { field, term } => out.push((field.as_str(), term.as_str())),
        }
    }

    /// Evaluate the query against a record.
    pub fn matches(&self, source: &impl FieldSource) -> bool {
        match self {
            Self::And { clauses } => clauses.iter().all(|c| c.matches(source)),
            Self::Or { clauses } => clauses.iter().any(|c| c.matches(source)),
            Self::Contains { field, term } => {
                let needle = term.to_lowercase();
                source
                    .field_values(field)
                    .iter()
                    .any(|value| value.to_lowercase().contains(&needle))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Record(HashMap<&'static str, Vec<String>>);

    impl FieldSource for Record {
        fn field_values(&self, field: &str) -> Vec<String> {
            self.0.get(field).cloned().unwrap_or_default()
        }
    }

    fn record(pairs: &[(&'static str, &str)]) -> Record {
        let mut map: HashMap<&'static str, Vec<String>> = HashMap::new();
        for (field, value) in pairs {
            map.entry(*field).or_default().push(value.to_string());
        }
        Record(map)
    }

    #[test]
    fn test_match_all_matches_anything() {
        assert!(QueryNode::match_all().is_match_all());
        assert!(QueryNode::match_all().matches(&record(&[])));
    }

    #[test]
    fn test_match_nothing_matches_nothing() {
        let r = record(&[("title", "red saree")]);
        assert!(!QueryNode::match_nothing().is_match_all());
        assert!(!QueryNode::match_nothing().matches(&r));
    }

    #[test]
    fn test_contains_is_case_insensitive_substring() {
        let r = record(&[("title", "Crimson Silk Saree")]);
        assert!(QueryNode::contains("title", "crimson").matches(&r));
        assert!(QueryNode::contains("title", "SILK").matches(&r));
        assert!(QueryNode::contains("title", "sar").matches(&r));
        assert!(!QueryNode::contains("title", "lehenga").matches(&r));
        assert!(!QueryNode::contains("category", "silk").matches(&r));
    }

    #[test]
    fn test_men_matches_women_substring() {
        // Known recall-over-precision artifact of substring matching.
        let r = record(&[("gender", "Women")]);
        assert!(QueryNode::contains("gender", "men").matches(&r));
    }

    #[test]
    fn test_and_or_evaluation() {
        let r = record(&[("title", "red dress"), ("category", "apparel")]);
        let q = QueryNode::and(vec![
            QueryNode::or(vec![
                QueryNode::contains("title", "maroon"),
                QueryNode::contains("title", "red"),
            ]),
            QueryNode::or(vec![QueryNode::contains("category", "apparel")]),
        ]);
        assert!(q.matches(&r));

        let q = QueryNode::and(vec![
            QueryNode::or(vec![QueryNode::contains("title", "red")]),
            QueryNode::or(vec![QueryNode::contains("title", "shoes")]),
        ]);
        assert!(!q.matches(&r));
    }

    #[test]
    fn test_clauses_and_pairs() {
        let q = QueryNode::and(vec![QueryNode::or(vec![
            QueryNode::contains("title", "red"),
            QueryNode::contains("category", "red"),
        ])]);
        assert_eq!(q.clauses().len(), 1);
        assert_eq!(q.pairs(), vec![("title", "red"), ("category", "red")]);
        assert!(QueryNode::contains("title", "x").clauses().is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let q = QueryNode::and(vec![QueryNode::or(vec![QueryNode::contains(
            "title", "boy",
        )])]);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "op": "and",
                "clauses": [{
                    "op": "or",
                    "clauses": [{"op": "contains", "field": "title", "term": "boy"}]
                }]
            })
        );
        let back: QueryNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }
}
