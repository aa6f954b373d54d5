//! Submission flow: score an uploaded document, check it for plagiarism and store the
//! result.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::check::PlagiarismChecker;
use crate::document::DocumentRef;
use crate::error::SubmitError;
use crate::evaluation::Evaluator;
use crate::fetch::DocumentFetcher;
use crate::store::{NewSubmission, SubmissionRecord, SubmissionStore};

const ALLOWED_EXTENSIONS: &[&str] = &["docx"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    pub submission_id: String,
    pub score: f64,
    pub plagiarism_percent: f64,
    pub feedback: String,
}

pub struct SubmissionService {
    store: Arc<dyn SubmissionStore>,
    fetcher: Arc<dyn DocumentFetcher>,
    evaluator: Arc<dyn Evaluator>,
    checker: PlagiarismChecker,
}

/// Whether `file_name` has an accepted extension (case-insensitive).
pub fn allowed_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

impl SubmissionService {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        fetcher: Arc<dyn DocumentFetcher>,
        evaluator: Arc<dyn Evaluator>,
        concurrency: usize,
    ) -> Self {
        let checker = PlagiarismChecker::new(store.clone(), fetcher.clone(), concurrency);
        Self {
            store,
            fetcher,
            evaluator,
            checker,
        }
    }

    /// Grade an uploaded document and record it against the assignment.
    ///
    /// The plagiarism check runs before the new record is stored, so the submission is
    /// only ever compared with earlier work.
    pub async fn submit(
        &self,
        assignment_id: &str,
        student_email: &str,
        file_name: &str,
        document: DocumentRef,
    ) -> Result<SubmissionOutcome, SubmitError> {
        if !allowed_file(file_name) {
            return Err(SubmitError::UnsupportedFile(file_name.to_string()));
        }

        let text = self
            .fetcher
            .fetch_text(&document)
            .await
            .map_err(SubmitError::Document)?;

        let evaluation = self.evaluator.evaluate(&text).await?;
        let report = self.checker.check_text(assignment_id, &text, None).await?;

        let record = self
            .store
            .add_submission(NewSubmission {
                assignment_id: assignment_id.to_string(),
                student_email: student_email.to_string(),
                document,
                score: evaluation.score,
                plagiarism_percent: report.percent,
                feedback: evaluation.feedback,
            })
            .await?;

        tracing::info!(
            assignment_id,
            submission_id = %record.id,
            score = record.score,
            plagiarism_percent = record.plagiarism_percent,
            "submission recorded"
        );

        Ok(SubmissionOutcome {
            submission_id: record.id,
            score: record.score,
            plagiarism_percent: record.plagiarism_percent,
            feedback: record.feedback,
        })
    }

    /// All submissions for an assignment, for the professor's view.
    pub async fn submissions(&self, assignment_id: &str) -> Result<Vec<SubmissionRecord>, SubmitError> {
        Ok(self.store.submissions_for_assignment(assignment_id).await?)
    }

    /// A student's own submission; other students' work is refused.
    pub async fn result_for_student(
        &self,
        assignment_id: &str,
        submission_id: &str,
        student_email: &str,
    ) -> Result<SubmissionRecord, SubmitError> {
        let record = self
            .store
            .submissions_for_assignment(assignment_id)
            .await?
            .into_iter()
            .find(|s| s.id == submission_id)
            .ok_or_else(|| SubmitError::NotFound(submission_id.to_string()))?;

        if record.student_email != student_email {
            return Err(SubmitError::Forbidden);
        }
        Ok(record)
    }
}
