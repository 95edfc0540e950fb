//! # Normalization Module
//!
//! ## Purpose
//! Pure string canonicalization used by the matching predicates. Identifier
//! normalization strips everything outside `[A-Za-z0-9]`; name normalization
//! case-folds and collapses punctuation so token comparison is stable.
//!
//! ## Input/Output Specification
//! - **Input**: Raw attribute strings from entries and queries
//! - **Output**: Canonical forms suitable for equality and similarity checks
//! - **Guarantee**: Empty input yields empty output; callers treat empty as
//!   "never matches"

/// Strip every character outside `[A-Za-z0-9]`, preserving case.
///
/// Case-insensitivity is applied at the comparison site, not here.
pub fn normalize_identifier(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Canonical token-sort key for a name: case-folded, punctuation replaced
/// with spaces, tokens sorted and re-joined with single spaces.
///
/// Non-ASCII letters are kept; the upstream lists carry transliterated and
/// native-script aliases alike.
pub fn token_sort_key(s: &str) -> String {
    let folded: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();

    let mut tokens: Vec<&str> = folded.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
