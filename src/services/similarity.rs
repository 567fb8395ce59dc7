//! Edit-distance similarity
//!
//! Scores how close two descriptions are, as a percentage of the longer
//! string, and finds near-duplicate pairs between small lists. The pair
//! search is a full cross product and is meant for batches of hundreds of
//! lines, not for indexed lookup.

use std::cmp::Ordering;

use serde::Serialize;

/// Levenshtein distance between case-folded inputs, counted in characters
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Similarity percentage in `0.0..=100.0`
///
/// `(longest - distance) / longest * 100`; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a
        .to_lowercase()
        .chars()
        .count()
        .max(b.to_lowercase().chars().count());

    if longest == 0 {
        return 100.0;
    }

    let distance = edit_distance(a, b);
    (longest - distance) as f64 / longest as f64 * 100.0
}

/// Two descriptions that look alike
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarPair {
    pub left: String,
    pub right: String,
    pub score: f64,
}

fn by_score_desc(a: &SimilarPair, b: &SimilarPair) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.left.cmp(&b.left))
        .then_with(|| a.right.cmp(&b.right))
}

/// Every pair across two lists scoring at least `threshold`, best first
pub fn cross_match<L, R>(left: &[L], right: &[R], threshold: f64) -> Vec<SimilarPair>
where
    L: AsRef<str>,
    R: AsRef<str>,
{
    let mut pairs = Vec::new();

    for l in left {
        for r in right {
            let score = similarity(l.as_ref(), r.as_ref());
            if score >= threshold {
                pairs.push(SimilarPair {
                    left: l.as_ref().to_string(),
                    right: r.as_ref().to_string(),
                    score,
                });
            }
        }
    }

    pairs.sort_by(by_score_desc);
    pairs
}

/// Pairs within one list that look alike, each unordered pair once
pub fn near_duplicates<S: AsRef<str>>(items: &[S], threshold: f64) -> Vec<SimilarPair> {
    let mut pairs = Vec::new();

    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            let score = similarity(a.as_ref(), b.as_ref());
            if score >= threshold {
                pairs.push(SimilarPair {
                    left: a.as_ref().to_string(),
                    right: b.as_ref().to_string(),
                    score,
                });
            }
        }
    }

    pairs.sort_by(by_score_desc);
    pairs
}
