//! Error taxonomy for grading and persistence.
//!
//! `GradingError` is what callers of the submission service see. Storage
//! backends report failures as `StorageError`, which the service surfaces
//! unchanged inside `GradingError::Storage`.

use std::fmt;

use thiserror::Error;

use crate::model::{LearnerId, QuizId};

/// The record a `NotFound` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Quiz(QuizId),
    Learner(LearnerId),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Quiz(id) => write!(f, "quiz {id}"),
            Resource::Learner(id) => write!(f, "learner {id}"),
        }
    }
}

/// Errors returned by the submission service.
#[derive(Debug, Error)]
pub enum GradingError {
    /// The referenced quiz or learner does not exist.
    #[error("{0} not found")]
    NotFound(Resource),

    /// The answer mapping was rejected before grading began.
    #[error("invalid answer sheet: {0}")]
    Validation(String),

    /// The persistence layer failed during a read or a write.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GradingError {
    /// Returns `true` if the caller supplied bad input, as opposed to the
    /// backend failing. Only storage failures are worth retrying.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GradingError::NotFound(_) | GradingError::Validation(_)
        )
    }
}

/// Errors raised by a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored snapshot could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A write would break a referential or uniqueness constraint.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The backend cannot serve requests right now.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_resource() {
        let err = GradingError::NotFound(Resource::Quiz(QuizId(7)));
        assert_eq!(err.to_string(), "quiz 7 not found");
        let err = GradingError::NotFound(Resource::Learner(LearnerId(3)));
        assert_eq!(err.to_string(), "learner 3 not found");
    }

    #[test]
    fn storage_errors_are_not_client_errors() {
        let err: GradingError = StorageError::Constraint("unknown quiz".into()).into();
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "constraint violation: unknown quiz");

        assert!(GradingError::Validation("bad key".into()).is_client_error());
        assert!(GradingError::NotFound(Resource::Quiz(QuizId(1))).is_client_error());
    }
}
