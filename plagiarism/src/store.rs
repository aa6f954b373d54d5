//! Submission storage.
//!
//! The production store is an external document database; [`SubmissionStore`] is the
//! seam it plugs into. [`InMemorySubmissionStore`] backs the command-line tool and the
//! tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::document::DocumentRef;
use crate::error::StoreError;

/// A stored submission for an assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRecord {
    pub id: String,
    pub assignment_id: String,
    pub student_email: String,
    /// Uploaded file; older records may have none.
    pub document: Option<DocumentRef>,
    pub score: f64,
    pub plagiarism_percent: f64,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: String,
    pub student_email: String,
    pub document: DocumentRef,
    pub score: f64,
    pub plagiarism_percent: f64,
    pub feedback: String,
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// All submissions for the assignment, oldest first.
    async fn submissions_for_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionRecord>, StoreError>;

    /// Persist a submission and return it with its assigned id.
    async fn add_submission(&self, submission: NewSubmission) -> Result<SubmissionRecord, StoreError>;
}

#[derive(Default)]
pub struct InMemorySubmissionStore {
    records: RwLock<Vec<SubmissionRecord>>,
    next_id: AtomicU64,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with prior submissions that have no score yet.
    pub async fn insert_prior(
        &self,
        assignment_id: &str,
        student_email: &str,
        document: Option<DocumentRef>,
    ) -> SubmissionRecord {
        let record = SubmissionRecord {
            id: self.allocate_id(),
            assignment_id: assignment_id.to_string(),
            student_email: student_email.to_string(),
            document,
            score: 0.0,
            plagiarism_percent: 0.0,
            feedback: String::new(),
            created_at: Utc::now(),
        };
        self.records.write().await.push(record.clone());
        record
    }

    fn allocate_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn submissions_for_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.assignment_id == assignment_id)
            .cloned()
            .collect())
    }

    async fn add_submission(&self, submission: NewSubmission) -> Result<SubmissionRecord, StoreError> {
        let record = SubmissionRecord {
            id: self.allocate_id(),
            assignment_id: submission.assignment_id,
            student_email: submission.student_email,
            document: Some(submission.document),
            score: submission.score,
            plagiarism_percent: submission.plagiarism_percent,
            feedback: submission.feedback,
            created_at: Utc::now(),
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_submissions_are_scoped_and_ordered() {
        let store = InMemorySubmissionStore::new();
        let first = store
            .insert_prior("a1", "one@uni.ac.za", Some(DocumentRef::parse("one.docx")))
            .await;
        store.insert_prior("a2", "two@uni.ac.za", None).await;
        let third = store
            .add_submission(NewSubmission {
                assignment_id: "a1".into(),
                student_email: "three@uni.ac.za".into(),
                document: DocumentRef::parse("three.docx"),
                score: 81.0,
                plagiarism_percent: 12.5,
                feedback: "Good".into(),
            })
            .await
            .unwrap();

        let subs = store.submissions_for_assignment("a1").await.unwrap();
        let ids: Vec<&str> = subs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), third.id.as_str()]);
        assert_eq!(subs[1].score, 81.0);
        assert!(store.submissions_for_assignment("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = InMemorySubmissionStore::new();
        let a = store.insert_prior("a", "x@uni.ac.za", None).await;
        let b = store.insert_prior("a", "y@uni.ac.za", None).await;
        assert_ne!(a.id, b.id);
    }
}
