//! quizmark-core — Quiz data model, grading, and submission service.
//!
//! This crate defines the records the rest of quizmark passes around, the
//! collaborator traits a persistence backend implements, and the grading
//! logic that scores a learner's answers against a quiz.

pub mod answers;
pub mod catalog;
pub mod error;
pub mod grader;
pub mod model;
pub mod service;
pub mod statistics;
pub mod traits;

pub use answers::AnswerSheet;
pub use error::{GradingError, Resource, StorageError};
pub use service::SubmissionService;
