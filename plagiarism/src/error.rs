//! Error types for the plagiarism pipeline.
//!
//! Each collaborator has its own error enum. Only the failures of the document under
//! test are fatal to a check; per-candidate failures are turned into
//! [`CandidateError`]s and skipped by the similarity engine.

use similarity::error::CandidateError;
use thiserror::Error;

/// Text could not be pulled out of a document's bytes.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid docx archive: {0}")]
    Archive(String),
    #[error("malformed document xml: {0}")]
    Xml(String),
    #[error("docx archive has no {0}")]
    MissingPart(&'static str),
    #[error("document is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// A document could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("document exceeds {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("this fetcher cannot load {0}")]
    UnsupportedLocation(String),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl From<FetchError> for CandidateError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Extract(e) => CandidateError::Extract(e.to_string()),
            other => CandidateError::Fetch(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("could not load prior submissions: {0}")]
    Store(#[from] StoreError),
    #[error("could not read the new document: {0}")]
    NewDocument(#[source] FetchError),
    #[error("similarity comparison did not complete: {0}")]
    Comparison(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("no API key configured for the evaluator")]
    MissingApiKey,
    #[error("evaluator request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("evaluator responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode evaluator response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("only .docx files are accepted, got {0:?}")]
    UnsupportedFile(String),
    #[error("could not read the submitted document: {0}")]
    Document(#[source] FetchError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("submission {0} not found")]
    NotFound(String),
    #[error("submission belongs to another student")]
    Forbidden,
}
