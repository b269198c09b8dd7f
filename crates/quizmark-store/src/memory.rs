//! In-memory store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizmark_core::catalog::Catalog;
use quizmark_core::model::{
    Learner, LearnerId, NewSubmission, Question, QuestionId, Quiz, QuizId, Submission,
};
use quizmark_core::traits::{LearnerDirectory, QuestionStore, SubmissionRecorder};
use quizmark_core::StorageError;

use crate::state::{ImportSummary, StoreState};

/// A store that keeps every table in process memory.
///
/// Reads take a shared lock; each write takes the exclusive lock for the
/// duration of a single insert or update.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from a catalog.
    pub fn from_catalog(catalog: &Catalog) -> Result<Self, StorageError> {
        let mut state = StoreState::default();
        state.import_catalog(catalog)?;
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    pub async fn import_catalog(&self, catalog: &Catalog) -> Result<ImportSummary, StorageError> {
        self.state.write().await.import_catalog(catalog)
    }

    pub async fn add_quiz(&self, quiz: Quiz) {
        self.state.write().await.put_quiz(quiz);
    }

    pub async fn add_learner(&self, learner: Learner) {
        self.state.write().await.put_learner(learner);
    }

    pub async fn add_question(&self, question: Question) -> Result<(), StorageError> {
        self.state.write().await.add_question(question)
    }

    /// Remove one question. Returns `false` if it did not exist.
    pub async fn remove_question(&self, quiz: QuizId, question: QuestionId) -> bool {
        self.state.write().await.remove_question(quiz, question)
    }

    /// Remove every question of a quiz, returning how many were removed.
    pub async fn clear_questions(&self, quiz: QuizId) -> usize {
        self.state.write().await.clear_questions(quiz)
    }

    pub async fn submission_count(&self) -> usize {
        self.state.read().await.submission_count()
    }
}

#[async_trait]
impl QuestionStore for InMemoryStore {
    async fn fetch_quiz(&self, quiz: QuizId) -> Result<Option<Quiz>, StorageError> {
        Ok(self.state.read().await.quiz(quiz))
    }

    async fn fetch_questions_by_quiz(&self, quiz: QuizId) -> Result<Vec<Question>, StorageError> {
        Ok(self.state.read().await.questions(quiz))
    }
}

#[async_trait]
impl LearnerDirectory for InMemoryStore {
    async fn learner_exists(&self, learner: LearnerId) -> Result<bool, StorageError> {
        Ok(self.state.read().await.learner_exists(learner))
    }
}

#[async_trait]
impl SubmissionRecorder for InMemoryStore {
    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, StorageError> {
        self.state.write().await.insert_submission(submission)
    }

    async fn submissions_for_quiz(&self, quiz: QuizId) -> Result<Vec<Submission>, StorageError> {
        Ok(self
            .state
            .read()
            .await
            .submissions_where(|s| s.quiz_id == quiz))
    }

    async fn submissions_for_learner(
        &self,
        learner: LearnerId,
    ) -> Result<Vec<Submission>, StorageError> {
        Ok(self
            .state
            .read()
            .await
            .submissions_where(|s| s.learner_id == learner))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use quizmark_core::model::QuestionKind;
    use quizmark_core::AnswerSheet;

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .add_quiz(Quiz {
                id: QuizId(1),
                lesson_id: 1,
                title: "Quiz".into(),
                description: String::new(),
            })
            .await;
        store
            .add_learner(Learner {
                id: LearnerId(1),
                name: "Ada".into(),
            })
            .await;
        store
            .add_question(Question {
                id: QuestionId(1),
                quiz_id: QuizId(1),
                text: "?".into(),
                kind: QuestionKind::ShortAnswer,
                options: vec![],
                correct_answer: "x".into(),
                points: 1,
                order_index: 0,
            })
            .await
            .unwrap();
        store
    }

    fn new_submission(quiz: u64, learner: u64) -> NewSubmission {
        NewSubmission {
            quiz_id: QuizId(quiz),
            learner_id: LearnerId(learner),
            answers: AnswerSheet::new(),
            score: Some(0),
            submitted_at: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let store = seeded().await;
        let before = Utc::now();
        let a = store.insert_submission(new_submission(1, 1)).await.unwrap();
        let b = store.insert_submission(new_submission(1, 1)).await.unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.submitted_at >= before);
        assert_eq!(store.submission_count().await, 2);
    }

    #[tokio::test]
    async fn insert_rejects_unknown_foreign_keys() {
        let store = seeded().await;
        let err = store.insert_submission(new_submission(2, 1)).await.unwrap_err();
        assert!(matches!(err, StorageError::Constraint(_)));
        let err = store.insert_submission(new_submission(1, 2)).await.unwrap_err();
        assert!(err.to_string().contains("unknown learner"));
        assert_eq!(store.submission_count().await, 0);
    }

    #[tokio::test]
    async fn history_is_ordered_by_submission_time() {
        let store = seeded().await;
        let now = Utc::now();
        let mut later = new_submission(1, 1);
        later.submitted_at = Some(now);
        let mut earlier = new_submission(1, 1);
        earlier.submitted_at = Some(now - Duration::minutes(5));

        let later = store.insert_submission(later).await.unwrap();
        let earlier = store.insert_submission(earlier).await.unwrap();

        let history = store.submissions_for_quiz(QuizId(1)).await.unwrap();
        assert_eq!(
            history.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![earlier.id, later.id]
        );
        assert_eq!(store.submissions_for_learner(LearnerId(1)).await.unwrap().len(), 2);
        assert!(store.submissions_for_quiz(QuizId(9)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn questions_can_be_removed() {
        let store = seeded().await;
        assert!(!store.remove_question(QuizId(1), QuestionId(5)).await);
        assert!(store.remove_question(QuizId(1), QuestionId(1)).await);
        assert!(store.fetch_questions_by_quiz(QuizId(1)).await.unwrap().is_empty());
        assert!(store.fetch_quiz(QuizId(1)).await.unwrap().is_some());
        assert_eq!(store.clear_questions(QuizId(1)).await, 0);
    }
}
