//! Pluggable approximate string similarity.
//!
//! Heading confirmation corroborates geometric outlier lines against TOC
//! entry text with a fuzzy score. The scorer is an injected capability so
//! the detector can be tested against a deterministic stub instead of a
//! real fuzzy-matching implementation.

/// Approximate string similarity on a normalized 0-100 scale.
pub trait TextSimilarity {
    /// Score the similarity of `a` and `b`; 100 means identical.
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Default scorer: Levenshtein distance normalized to 0-100, tolerant of
/// case and whitespace differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl TextSimilarity for NormalizedLevenshtein {
    fn score(&self, a: &str, b: &str) -> f64 {
        let a = normalize(a);
        let b = normalize(b);
        if a.is_empty() && b.is_empty() {
            return 100.0;
        }
        strsim::normalized_levenshtein(&a, &b) * 100.0
    }
}

/// Lowercase and collapse whitespace runs before scoring.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
