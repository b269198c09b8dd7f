//! JSON-file-backed store.
//!
//! The whole store lives in one JSON snapshot. Every mutation is applied to
//! a copy of the state, the copy is written to disk, and only then does it
//! replace the live state. A failed write therefore leaves both the file and
//! the in-memory tables as they were.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use quizmark_core::catalog::Catalog;
use quizmark_core::model::{
    Learner, LearnerId, NewSubmission, Question, QuestionId, Quiz, QuizId, Submission,
};
use quizmark_core::traits::{LearnerDirectory, QuestionStore, SubmissionRecorder};
use quizmark_core::StorageError;

use crate::state::{ImportSummary, Snapshot, StoreState};

pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                StoreState::from_snapshot(snapshot)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no store at {}, starting empty", path.display());
                StoreState::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut StoreState) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut live = self.state.lock().await;
        let mut next = live.clone();
        let out = apply(&mut next)?;
        write_snapshot(&self.path, &next.to_snapshot()).await?;
        *live = next;
        Ok(out)
    }

    pub async fn import_catalog(&self, catalog: &Catalog) -> Result<ImportSummary, StorageError> {
        self.mutate(|state| state.import_catalog(catalog)).await
    }

    pub async fn add_quiz(&self, quiz: Quiz) -> Result<(), StorageError> {
        self.mutate(|state| {
            state.put_quiz(quiz);
            Ok(())
        })
        .await
    }

    pub async fn add_learner(&self, learner: Learner) -> Result<(), StorageError> {
        self.mutate(|state| {
            state.put_learner(learner);
            Ok(())
        })
        .await
    }

    pub async fn add_question(&self, question: Question) -> Result<(), StorageError> {
        self.mutate(|state| state.add_question(question)).await
    }

    pub async fn remove_question(
        &self,
        quiz: QuizId,
        question: QuestionId,
    ) -> Result<bool, StorageError> {
        self.mutate(|state| Ok(state.remove_question(quiz, question)))
            .await
    }

    pub async fn clear_questions(&self, quiz: QuizId) -> Result<usize, StorageError> {
        self.mutate(|state| Ok(state.clear_questions(quiz))).await
    }

    pub async fn submission_count(&self) -> usize {
        self.state.lock().await.submission_count()
    }
}

/// Write the snapshot to a sibling temp file, then rename it into place.
async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StorageError> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, json).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl QuestionStore for JsonFileStore {
    async fn fetch_quiz(&self, quiz: QuizId) -> Result<Option<Quiz>, StorageError> {
        Ok(self.state.lock().await.quiz(quiz))
    }

    async fn fetch_questions_by_quiz(&self, quiz: QuizId) -> Result<Vec<Question>, StorageError> {
        Ok(self.state.lock().await.questions(quiz))
    }
}

#[async_trait]
impl LearnerDirectory for JsonFileStore {
    async fn learner_exists(&self, learner: LearnerId) -> Result<bool, StorageError> {
        Ok(self.state.lock().await.learner_exists(learner))
    }
}

#[async_trait]
impl SubmissionRecorder for JsonFileStore {
    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, StorageError> {
        self.mutate(|state| state.insert_submission(submission))
            .await
    }

    async fn submissions_for_quiz(&self, quiz: QuizId) -> Result<Vec<Submission>, StorageError> {
        Ok(self
            .state
            .lock()
            .await
            .submissions_where(|s| s.quiz_id == quiz))
    }

    async fn submissions_for_learner(
        &self,
        learner: LearnerId,
    ) -> Result<Vec<Submission>, StorageError> {
        Ok(self
            .state
            .lock()
            .await
            .submissions_where(|s| s.learner_id == learner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizmark_core::model::QuestionKind;
    use quizmark_core::AnswerSheet;

    fn quiz() -> Quiz {
        Quiz {
            id: QuizId(1),
            lesson_id: 1,
            title: "Persisted".into(),
            description: String::new(),
        }
    }

    fn new_submission() -> NewSubmission {
        let answers: AnswerSheet = [(QuestionId(1), "4".to_string())].into_iter().collect();
        NewSubmission {
            quiz_id: QuizId(1),
            learner_id: LearnerId(1),
            answers,
            score: Some(10),
            submitted_at: None,
        }
    }

    async fn seeded(path: &Path) -> JsonFileStore {
        let store = JsonFileStore::open(path).await.unwrap();
        store.add_quiz(quiz()).await.unwrap();
        store
            .add_learner(Learner {
                id: LearnerId(1),
                name: "Ada".into(),
            })
            .await
            .unwrap();
        store
            .add_question(Question {
                id: QuestionId(1),
                quiz_id: QuizId(1),
                text: "2 + 2?".into(),
                kind: QuestionKind::ShortAnswer,
                options: vec![],
                correct_answer: "4".into(),
                points: 10,
                order_index: 0,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json")).await.unwrap();
        assert!(store.fetch_quiz(QuizId(1)).await.unwrap().is_none());
        assert!(!dir.path().join("store.json").exists());
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/store.json");

        let recorded = {
            let store = seeded(&path).await;
            store.insert_submission(new_submission()).await.unwrap()
        };

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let history = reopened.submissions_for_quiz(QuizId(1)).await.unwrap();
        assert_eq!(history, vec![recorded]);
        assert_eq!(reopened.fetch_questions_by_quiz(QuizId(1)).await.unwrap().len(), 1);
        assert!(reopened.learner_exists(LearnerId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn rejected_insert_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = seeded(&path).await;
        let before = std::fs::read(&path).unwrap();

        let mut bad = new_submission();
        bad.learner_id = LearnerId(42);
        assert!(store.insert_submission(bad).await.is_err());

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(store.submission_count().await, 0);
    }

    #[tokio::test]
    async fn failed_write_rolls_back_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = seeded(&path).await;

        // A directory where the temp file should go makes the write fail.
        std::fs::create_dir(dir.path().join("store.json.tmp")).unwrap();

        let err = store.insert_submission(new_submission()).await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
        assert_eq!(store.submission_count().await, 0);
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        // A non-empty directory at the store path cannot be renamed over.
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let err = store.add_quiz(quiz()).await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
        assert!(!dir.path().join("store.json.tmp").exists());
        assert!(store.fetch_quiz(QuizId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_question_import_keeps_store_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = seeded(&path).await;
        let before = std::fs::read(&path).unwrap();

        let question = store.fetch_questions_by_quiz(QuizId(1)).await.unwrap()[0].clone();
        let catalog = Catalog {
            learners: vec![],
            quizzes: vec![quizmark_core::catalog::QuizEntry {
                quiz: quiz(),
                questions: vec![question.clone(), question],
            }],
        };
        let err = store.import_catalog(&catalog).await.unwrap_err();
        assert!(matches!(err, StorageError::Constraint(_)));
        assert_eq!(std::fs::read(&path).unwrap(), before);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.fetch_questions_by_quiz(QuizId(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result = JsonFileStore::open(&path).await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
