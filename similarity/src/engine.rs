//! # Similarity Engine
//!
//! Scores a new document against a comparison set of prior submissions and reports the
//! highest similarity found. The engine does no I/O: candidate texts arrive already
//! fetched, each as a `Result` so that a failed fetch is just a skipped entry.

use crate::comparators::sequence_comparator::SequenceComparator;
use crate::round2;
use crate::traits::comparator::TextComparator;
use crate::types::{Candidate, CandidateScore, SimilarityReport};

/// Stateless scorer; safe to share across threads and reuse for any number of checks.
pub struct SimilarityEngine {
    comparator: Box<dyn TextComparator>,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityEngine {
    /// Engine using the character-level [`SequenceComparator`].
    pub fn new() -> Self {
        Self {
            comparator: Box::new(SequenceComparator),
        }
    }

    /// Replace the comparison strategy.
    pub fn with_comparator<C: TextComparator + 'static>(mut self, comparator: C) -> Self {
        self.comparator = Box::new(comparator);
        self
    }

    /// Similarity ratio of two texts in `[0.0, 1.0]`.
    pub fn pairwise_similarity(&self, a: &str, b: &str) -> f64 {
        self.comparator.similarity(a, b).clamp(0.0, 1.0)
    }

    /// Highest similarity against any loadable candidate, as a percentage rounded to two
    /// decimals. Returns `0.0` for an empty set or when every candidate failed to load.
    pub fn max_similarity_percent(&self, new_text: &str, candidates: &[Candidate]) -> f64 {
        self.evaluate(new_text, candidates).percent
    }

    /// Compare `new_text` against every candidate and summarise the outcome.
    ///
    /// Failed candidates are recorded with their error and otherwise ignored. When two
    /// candidates tie for the highest ratio, the earlier one is reported as `best_match`.
    pub fn evaluate(&self, new_text: &str, candidates: &[Candidate]) -> SimilarityReport {
        let scores: Vec<CandidateScore> = candidates
            .iter()
            .map(|candidate| match &candidate.text {
                Ok(text) => CandidateScore {
                    id: candidate.id.clone(),
                    ratio: Some(self.pairwise_similarity(new_text, text)),
                    error: None,
                },
                Err(err) => {
                    tracing::debug!(candidate = %candidate.id, error = %err, "skipping candidate");
                    CandidateScore {
                        id: candidate.id.clone(),
                        ratio: None,
                        error: Some(err.to_string()),
                    }
                }
            })
            .collect();

        let best = scores
            .iter()
            .filter_map(|score| score.ratio.map(|ratio| (score, ratio)))
            .fold(None, |best: Option<(&CandidateScore, f64)>, (score, ratio)| match best {
                Some((_, top)) if top >= ratio => best,
                _ => Some((score, ratio)),
            });

        let compared = scores.iter().filter(|s| s.ratio.is_some()).count();

        SimilarityReport {
            percent: best.map_or(0.0, |(_, ratio)| to_percent(ratio)),
            best_match: best.map(|(score, _)| score.id.clone()),
            compared,
            skipped: scores.len() - compared,
            scores,
        }
    }
}

/// `round(ratio * 100, 2)`, kept inside `[0, 100]`.
fn to_percent(ratio: f64) -> f64 {
    round2(ratio * 100.0).clamp(0.0, 100.0)
}
