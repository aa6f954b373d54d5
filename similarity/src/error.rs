//! Similarity Error Types
//!
//! The engine itself never fails: comparing two texts is a total function. The only
//! failures it knows about are per-candidate ones, reported by whoever fetched the
//! candidate's text, and those are skipped rather than propagated.

use thiserror::Error;

/// Why a candidate document could not be compared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    /// The document could not be retrieved (network, file system, status code).
    #[error("failed to fetch document: {0}")]
    Fetch(String),
    /// The document was retrieved but no text could be extracted from it.
    #[error("failed to extract text: {0}")]
    Extract(String),
    /// The submission has no document attached.
    #[error("submission has no document")]
    MissingDocument,
}
