//! # Plagiarism Check
//!
//! Compares a new submission with every earlier submission of the same assignment.
//!
//! 1. Prior submissions are loaded from the [`SubmissionStore`]. With none, the check
//!    reports `0.0` without touching the new document.
//! 2. The new document's text is fetched. This is the only fetch whose failure aborts the
//!    check.
//! 3. Prior documents are fetched concurrently, at most `concurrency` at a time. A prior
//!    submission that has no document, or whose document cannot be read, is skipped.
//! 4. The [`SimilarityEngine`] reports the highest similarity found.

use futures::stream::{self, StreamExt};
use similarity::engine::SimilarityEngine;
use similarity::error::CandidateError;
use similarity::types::{Candidate, SimilarityReport};
use std::sync::Arc;

use crate::document::DocumentRef;
use crate::error::CheckError;
use crate::fetch::DocumentFetcher;
use crate::store::{SubmissionRecord, SubmissionStore};

pub struct PlagiarismChecker {
    store: Arc<dyn SubmissionStore>,
    fetcher: Arc<dyn DocumentFetcher>,
    engine: Arc<SimilarityEngine>,
    concurrency: usize,
}

impl PlagiarismChecker {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        fetcher: Arc<dyn DocumentFetcher>,
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            fetcher,
            engine: Arc::new(SimilarityEngine::new()),
            concurrency: concurrency.max(1),
        }
    }

    pub fn with_engine(mut self, engine: SimilarityEngine) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    /// Check the document at `document` against the assignment's prior submissions.
    ///
    /// `exclude` names a submission id to leave out, typically the document's own record
    /// when re-checking something already stored.
    pub async fn check(
        &self,
        assignment_id: &str,
        document: &DocumentRef,
        exclude: Option<&str>,
    ) -> Result<SimilarityReport, CheckError> {
        let prior = self.prior_submissions(assignment_id, exclude).await?;
        if prior.is_empty() {
            tracing::info!(assignment_id, "no prior submissions; nothing to compare");
            return Ok(SimilarityReport::empty());
        }

        let new_text = self
            .fetcher
            .fetch_text(document)
            .await
            .map_err(CheckError::NewDocument)?;

        self.compare(assignment_id, &new_text, &prior).await
    }

    /// Like [`check`](Self::check) for text that has already been extracted.
    pub async fn check_text(
        &self,
        assignment_id: &str,
        new_text: &str,
        exclude: Option<&str>,
    ) -> Result<SimilarityReport, CheckError> {
        let prior = self.prior_submissions(assignment_id, exclude).await?;
        if prior.is_empty() {
            tracing::info!(assignment_id, "no prior submissions; nothing to compare");
            return Ok(SimilarityReport::empty());
        }
        self.compare(assignment_id, new_text, &prior).await
    }

    async fn prior_submissions(
        &self,
        assignment_id: &str,
        exclude: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, CheckError> {
        let mut prior = self.store.submissions_for_assignment(assignment_id).await?;
        if let Some(excluded) = exclude {
            prior.retain(|s| s.id != excluded);
        }
        Ok(prior)
    }

    async fn compare(
        &self,
        assignment_id: &str,
        new_text: &str,
        prior: &[SubmissionRecord],
    ) -> Result<SimilarityReport, CheckError> {
        let candidates = stream::iter(prior)
            .map(|submission| self.load_candidate(submission))
            .buffered(self.concurrency)
            .collect::<Vec<Candidate>>()
            .await;

        // matching is CPU-bound; keep it off the async workers
        let engine = Arc::clone(&self.engine);
        let text = new_text.to_owned();
        let report =
            tokio::task::spawn_blocking(move || engine.evaluate(&text, &candidates)).await?;

        tracing::info!(
            assignment_id,
            percent = report.percent,
            best_match = ?report.best_match,
            compared = report.compared,
            skipped = report.skipped,
            "plagiarism check complete"
        );
        Ok(report)
    }

    async fn load_candidate(&self, submission: &SubmissionRecord) -> Candidate {
        let Some(document) = &submission.document else {
            return Candidate::failed(submission.id.clone(), CandidateError::MissingDocument);
        };

        match self.fetcher.fetch_text(document).await {
            Ok(text) => Candidate::loaded(submission.id.clone(), text),
            Err(err) => {
                tracing::warn!(
                    submission_id = %submission.id,
                    %document,
                    error = %err,
                    "skipping prior submission"
                );
                Candidate::failed(submission.id.clone(), err.into())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::document::DocumentRef;
    use crate::error::{ExtractError, FetchError};
    use crate::fetch::DocumentFetcher;

    /// Serves canned texts by location; unknown locations fail with a 404.
    #[derive(Default)]
    pub struct StubFetcher {
        texts: HashMap<String, String>,
        broken: Vec<String>,
        pub requests: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn with(mut self, location: &str, text: &str) -> Self {
            self.texts.insert(location.to_string(), text.to_string());
            self
        }

        /// Location that is found but cannot be parsed.
        pub fn with_broken(mut self, location: &str) -> Self {
            self.broken.push(location.to_string());
            self
        }
    }

    #[async_trait]
    impl DocumentFetcher for StubFetcher {
        async fn fetch_text(&self, document: &DocumentRef) -> Result<String, FetchError> {
            let key = document.to_string();
            self.requests.lock().unwrap().push(key.clone());
            if self.broken.contains(&key) {
                return Err(ExtractError::Archive("corrupt".into()).into());
            }
            self.texts.get(&key).cloned().ok_or(FetchError::Status(404))
        }
    }
}
