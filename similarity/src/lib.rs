//! # Similarity Library
//!
//! Text similarity scoring for plagiarism detection. A newly submitted document is
//! compared against the prior submissions of the same assignment and the highest
//! pairwise similarity is reported as a percentage.
//!
//! ## Key Concepts
//! - **SequenceMatcher**: greedy longest-matching-block search over two sequences.
//! - **Comparators**: pluggable strategies that turn two texts into a ratio in `[0, 1]`.
//! - **SimilarityEngine**: folds per-candidate results into a single percentage, skipping
//!   candidates whose text could not be loaded.
//!
//! ```rust
//! use similarity::{max_similarity_percent, pairwise_similarity, types::Candidate};
//!
//! assert_eq!(pairwise_similarity("abcdef", "abcxyz"), 0.5);
//!
//! let prior = vec![Candidate::loaded("a", "abcxyz")];
//! assert_eq!(max_similarity_percent("abcdef", &prior), 50.0);
//! ```

pub mod comparators;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod traits;
pub mod types;

use crate::engine::SimilarityEngine;
use crate::types::Candidate;

/// Round a float to two decimal places.
#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Similarity ratio of two texts using the default engine.
pub fn pairwise_similarity(a: &str, b: &str) -> f64 {
    SimilarityEngine::new().pairwise_similarity(a, b)
}

/// Plagiarism percentage of `new_text` against `candidates` using the default engine.
pub fn max_similarity_percent(new_text: &str, candidates: &[Candidate]) -> f64 {
    SimilarityEngine::new().max_similarity_percent(new_text, candidates)
}
