//! # Plagiarism Library
//!
//! The assignment-submission side of plagiarism detection: retrieving submitted
//! documents, extracting their text, comparing a new submission with the earlier ones for
//! the same assignment, and grading uploads with an AI evaluator.
//!
//! ## Modules
//! - [`document`]: document references and `.docx` / plain-text extraction.
//! - [`fetch`]: HTTP and file-system document fetchers.
//! - [`store`]: the submission storage seam and an in-memory store.
//! - [`check`]: the assignment-level plagiarism check.
//! - [`evaluation`]: AI scoring and feedback.
//! - [`submission`]: the end-to-end submit flow.

pub mod check;
pub mod document;
pub mod error;
pub mod evaluation;
pub mod fetch;
pub mod store;
pub mod submission;
