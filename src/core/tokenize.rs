//! Query normalization and tokenization.

use std::collections::BTreeSet;

/// Lowercase `raw` and replace every character outside `[a-z0-9]` with a
/// space.
///
/// Punctuation separates rather than joins: `"men's"` becomes `"men s"`.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Normalize `raw` and split it into a deduplicated set of tokens.
///
/// Returns an empty set for blank or punctuation-only input.
pub fn tokenize(raw: &str) -> BTreeSet<String> {
    normalize(raw)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(terms: &[&str]) -> BTreeSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize("RED Dress"), "red dress");
    }

    #[test]
    fn test_normalize_replaces_punctuation_with_space() {
        assert_eq!(normalize("men's"), "men s");
        assert_eq!(normalize("t-shirt/top"), "t shirt top");
    }

    #[test]
    fn test_normalize_drops_non_ascii_letters() {
        assert_eq!(normalize("café"), "caf ");
    }

    #[test]
    fn test_tokenize_punctuation_split() {
        assert_eq!(tokenize("men's wear"), tokens(&["men", "s", "wear"]));
    }

    #[test]
    fn test_tokenize_deduplicates() {
        assert_eq!(tokenize("red red dress"), tokens(&["red", "dress"]));
        assert_eq!(tokenize("Red RED red"), tokens(&["red"]));
    }

    #[test]
    fn test_tokenize_keeps_digits() {
        assert_eq!(tokenize("size 42 shoes"), tokens(&["size", "42", "shoes"]));
    }

    #[test]
    fn test_tokenize_collapses_whitespace_runs() {
        assert_eq!(tokenize("  silk \t\n saree  "), tokens(&["silk", "saree"]));
    }

    #[test]
    fn test_tokenize_blank_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("!!!").is_empty());
        assert!(tokenize("?!-_.,").is_empty());
    }
}
