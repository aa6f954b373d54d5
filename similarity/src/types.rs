//! # Types Module
//!
//! Data carried in and out of a plagiarism comparison.

use crate::error::CandidateError;
use serde::Serialize;

/// A submitted document and its extracted plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// One entry of a comparison set: a prior submission whose text may have failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub text: Result<String, CandidateError>,
}

impl Candidate {
    pub fn loaded(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Ok(text.into()),
        }
    }

    pub fn failed(id: impl Into<String>, error: CandidateError) -> Self {
        Self {
            id: id.into(),
            text: Err(error),
        }
    }
}

impl From<Document> for Candidate {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            text: Ok(doc.text),
        }
    }
}

/// Outcome of comparing against a single candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub id: String,
    /// Similarity ratio in `[0.0, 1.0]`, absent when the candidate was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    /// Reason the candidate was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of checking one document against a comparison set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityReport {
    /// Highest pairwise similarity as a percentage in `[0, 100]`, rounded to two decimals.
    /// `0.0` when nothing could be compared.
    pub percent: f64,
    /// Id of the candidate that produced `percent`, if any comparison succeeded.
    pub best_match: Option<String>,
    pub compared: usize,
    pub skipped: usize,
    pub scores: Vec<CandidateScore>,
}

impl SimilarityReport {
    /// Report for an empty comparison set.
    pub fn empty() -> Self {
        Self {
            percent: 0.0,
            best_match: None,
            compared: 0,
            skipped: 0,
            scores: Vec::new(),
        }
    }
}
