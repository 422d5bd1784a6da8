//! Query normalization
//!
//! The backend treats queries case- and whitespace-insensitively, so the
//! client normalizes the same way before comparing against the minimum
//! length threshold or deriving cache keys. Two queries with the same
//! normalized form share one cache entry and one dispatch decision.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize a raw query: trim, lowercase, collapse inner whitespace runs
/// to a single space.
pub fn normalize(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").to_lowercase()
}

/// Number of characters in the normalized form of `raw`.
pub fn normalized_len(raw: &str) -> usize {
    normalize(raw).chars().count()
}

/// Whether `raw` is long enough (after normalization) to dispatch a fetch.
pub fn meets_threshold(raw: &str, min_length: usize) -> bool {
    normalized_len(raw) >= min_length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Paris  "), "paris");
        assert_eq!(normalize("EIFFEL Tower"), "eiffel tower");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("new   york\tcity"), "new york city");
        assert_eq!(normalize(" beach \n resort "), "beach resort");
    }

    #[test]
    fn test_normalized_len_counts_chars() {
        assert_eq!(normalized_len("  ab "), 2);
        // Multi-byte characters count once each.
        assert_eq!(normalized_len("tōkyō"), 5);
    }

    #[test]
    fn test_meets_threshold() {
        assert!(!meets_threshold("", 2));
        assert!(!meets_threshold("   ", 2));
        assert!(!meets_threshold("a", 2));
        assert!(meets_threshold("ab", 2));
        assert!(meets_threshold("a", 1));
    }
}
