//! # Name Scoring Module
//!
//! ## Purpose
//! Token-order-insensitive fuzzy similarity between name strings, plus the
//! candidate precedence chain used to match one entry against a query name.
//!
//! ## Input/Output Specification
//! - **Input**: Two name strings, or an entry plus a query name and threshold
//! - **Output**: Similarity percentage in 0..=100; match verdict with the
//!   winning candidate's score
//! - **Precedence**: whole name, then comma-split parts of the name, then
//!   alt names; the first candidate clearing the threshold wins
//!
//! ## Key Features
//! - Commutative scoring: `token_sort_ratio(a, b) == token_sort_ratio(b, a)`
//! - 100 for identical strings after canonicalization
//! - Short-circuit evaluation in candidate precedence order

use crate::normalize::token_sort_key;
use crate::Entry;
use strsim::normalized_levenshtein;

/// Outcome of scoring one entry's name candidates against a query name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameScore {
    /// Winning candidate's score when matched; otherwise the highest score
    /// observed across all candidates (diagnostic only)
    pub score: u8,
    /// Whether any candidate reached the minimum score
    pub matched: bool,
}

/// Token-order-insensitive similarity ratio between two strings, 0..=100.
///
/// Both inputs are reduced to their sorted-token canonical form, then
/// compared by normalized edit distance.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let a = token_sort_key(a);
    let b = token_sort_key(b);
    (normalized_levenshtein(&a, &b) * 100.0).round() as u8
}

/// Score an entry's name candidates against a query name.
///
/// Candidates are tried in precedence order: the whole primary name, then
/// each comma-delimited part of it, then each alt name. The first candidate
/// scoring at or above `minimum_score` wins and stops the scan; later
/// candidates may well have scored higher. When nothing clears the bar the
/// result carries the highest score seen, but callers must only rely on
/// `matched` being false in that case.
pub fn best_name_score(entry: &Entry, query_name: &str, minimum_score: u8) -> NameScore {
    let mut best = token_sort_ratio(&entry.name, query_name);
    if best >= minimum_score {
        return NameScore {
            score: best,
            matched: true,
        };
    }

    for part in entry.name.split(',') {
        let score = token_sort_ratio(part, query_name);
        if score >= minimum_score {
            return NameScore {
                score,
                matched: true,
            };
        }
        best = best.max(score);
    }

    for alt in &entry.alt_names {
        let score = token_sort_ratio(alt, query_name);
        if score >= minimum_score {
            return NameScore {
                score,
                matched: true,
            };
        }
        best = best.max(score);
    }

    NameScore {
        score: best,
        matched: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_named(name: &str, alt_names: &[&str]) -> Entry {
        Entry {
            name: name.to_string(),
            alt_names: alt_names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(token_sort_ratio("Luciano BRUNETTI", "Luciano BRUNETTI"), 100);
        assert_eq!(token_sort_ratio("a", "a"), 100);
    }

    #[test]
    fn test_score_ignores_token_order_and_case() {
        assert_eq!(token_sort_ratio("BRUNETTI Luciano", "luciano brunetti"), 100);
        assert_eq!(token_sort_ratio("DWEIK, Aziz", "Aziz DWEIK"), 100);
    }

    #[test]
    fn test_score_is_symmetric() {
        let pairs = [
            ("Luciano BRUNETTI", "Luciano BRUNETI"),
            ("Aziz DWEIK", "Abu Hasan"),
            ("KARAMAY URBAN CREDIT COOPERATIVES", "KARAMAY CREDIT"),
        ];
        for (a, b) in pairs {
            assert_eq!(token_sort_ratio(a, b), token_sort_ratio(b, a));
        }
    }

    #[test]
    fn test_dissimilar_strings_score_low() {
        assert!(token_sort_ratio("Luciano BRUNETTI", "XQZW") < 30);
    }

    #[test]
    fn test_whole_name_match_short_circuits() {
        let entry = entry_named("Luciano BRUNETTI", &[]);
        let result = best_name_score(&entry, "Luciano BRUNETTI", 90);
        assert!(result.matched);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_comma_split_candidate_matches() {
        // The composite name scores below 90 against the query, but the
        // first comma-delimited part scores 100.
        let entry = entry_named("Aziz DWEIK, Abu Hasan", &[]);
        assert!(token_sort_ratio(&entry.name, "Aziz DWEIK") < 90);

        let result = best_name_score(&entry, "Aziz DWEIK", 90);
        assert!(result.matched);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_alt_name_matches_after_name_parts_fail() {
        let entry = entry_named(
            "KARAMAY URBAN CREDIT COOPERATIVES",
            &["KELAMAYI URBAN CREDIT COOPERATIVES", "KARAMAY CITY COMMERCIAL BANK"],
        );
        let result = best_name_score(&entry, "KELAMAYI URBAN CREDIT COOPERATIVES", 95);
        assert!(result.matched);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_first_clearing_candidate_wins_over_later_higher_one() {
        // Both alt names clear a low threshold; the scan stops at the first
        // even though the second is the exact match.
        let entry = entry_named("ZZZZ QQQQ", &["Jon Smith", "John Smith"]);
        let result = best_name_score(&entry, "John Smith", 70);
        assert!(result.matched);
        assert_eq!(result.score, token_sort_ratio("Jon Smith", "John Smith"));
        assert!(result.score < 100);
    }

    #[test]
    fn test_no_candidate_reaches_threshold() {
        let entry = entry_named("Luciano BRUNETTI", &["Luchano BRUNETI"]);
        let result = best_name_score(&entry, "Completely Different Person", 90);
        assert!(!result.matched);
        assert!(result.score < 90);
    }
}
