//! Collaborator traits implemented by persistence backends.
//!
//! The submission service only ever talks to storage through these traits.
//! `quizmark-store` provides in-memory and JSON-file implementations.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::model::{LearnerId, NewSubmission, Question, Quiz, QuizId, Submission};

// ---------------------------------------------------------------------------
// Question store
// ---------------------------------------------------------------------------

/// Read access to quizzes and their questions.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Look up a quiz by id. `Ok(None)` means the quiz does not exist.
    async fn fetch_quiz(&self, quiz: QuizId) -> Result<Option<Quiz>, StorageError>;

    /// All questions belonging to a quiz, in any order. An unknown quiz
    /// yields an empty list; existence is checked with [`fetch_quiz`].
    ///
    /// [`fetch_quiz`]: QuestionStore::fetch_quiz
    async fn fetch_questions_by_quiz(&self, quiz: QuizId) -> Result<Vec<Question>, StorageError>;
}

// ---------------------------------------------------------------------------
// Learner directory
// ---------------------------------------------------------------------------

/// Existence checks for learners.
#[async_trait]
pub trait LearnerDirectory: Send + Sync {
    async fn learner_exists(&self, learner: LearnerId) -> Result<bool, StorageError>;
}

// ---------------------------------------------------------------------------
// Submission recorder
// ---------------------------------------------------------------------------

/// Append-only persistence for graded submissions.
#[async_trait]
pub trait SubmissionRecorder: Send + Sync {
    /// Store one new submission and return it with its assigned id.
    ///
    /// Fails with [`StorageError::Constraint`] when the quiz or learner it
    /// references is unknown to the backend.
    async fn insert_submission(&self, submission: NewSubmission)
        -> Result<Submission, StorageError>;

    /// Submissions for a quiz, oldest first.
    async fn submissions_for_quiz(&self, quiz: QuizId) -> Result<Vec<Submission>, StorageError>;

    /// Submissions by a learner, oldest first.
    async fn submissions_for_learner(
        &self,
        learner: LearnerId,
    ) -> Result<Vec<Submission>, StorageError>;
}
