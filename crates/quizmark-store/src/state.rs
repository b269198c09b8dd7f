//! Table state shared by the in-memory and JSON-file backends.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use quizmark_core::catalog::Catalog;
use quizmark_core::model::{
    Learner, LearnerId, NewSubmission, Question, QuestionId, Quiz, QuizId, Submission,
};
use quizmark_core::StorageError;

const SNAPSHOT_VERSION: u32 = 1;

/// Counts of records written by a catalog import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub quizzes: usize,
    pub questions: usize,
    pub learners: usize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    quizzes: BTreeMap<QuizId, Quiz>,
    questions: BTreeMap<QuizId, Vec<Question>>,
    learners: BTreeMap<LearnerId, Learner>,
    submissions: Vec<Submission>,
}

/// On-disk layout of a store.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    version: u32,
    #[serde(default)]
    quizzes: Vec<Quiz>,
    #[serde(default)]
    questions: Vec<Question>,
    #[serde(default)]
    learners: Vec<Learner>,
    #[serde(default)]
    submissions: Vec<Submission>,
}

impl StoreState {
    pub(crate) fn quiz(&self, id: QuizId) -> Option<Quiz> {
        self.quizzes.get(&id).cloned()
    }

    pub(crate) fn questions(&self, quiz: QuizId) -> Vec<Question> {
        self.questions.get(&quiz).cloned().unwrap_or_default()
    }

    pub(crate) fn learner_exists(&self, id: LearnerId) -> bool {
        self.learners.contains_key(&id)
    }

    /// Insert or replace a quiz. Existing questions are kept.
    pub(crate) fn put_quiz(&mut self, quiz: Quiz) {
        self.quizzes.insert(quiz.id, quiz);
    }

    pub(crate) fn put_learner(&mut self, learner: Learner) {
        self.learners.insert(learner.id, learner);
    }

    pub(crate) fn add_question(&mut self, question: Question) -> Result<(), StorageError> {
        if !self.quizzes.contains_key(&question.quiz_id) {
            return Err(StorageError::Constraint(format!(
                "question {} references unknown quiz {}",
                question.id, question.quiz_id
            )));
        }
        let questions = self.questions.entry(question.quiz_id).or_default();
        if questions.iter().any(|q| q.id == question.id) {
            return Err(StorageError::Constraint(format!(
                "quiz {} already has a question {}",
                question.quiz_id, question.id
            )));
        }
        questions.push(question);
        Ok(())
    }

    pub(crate) fn remove_question(&mut self, quiz: QuizId, question: QuestionId) -> bool {
        let Some(questions) = self.questions.get_mut(&quiz) else {
            return false;
        };
        let before = questions.len();
        questions.retain(|q| q.id != question);
        questions.len() != before
    }

    pub(crate) fn clear_questions(&mut self, quiz: QuizId) -> usize {
        self.questions.remove(&quiz).map_or(0, |removed| removed.len())
    }

    /// Upsert every quiz and learner in the catalog. A quiz's question list
    /// is replaced wholesale; submissions are never touched.
    ///
    /// The whole catalog is checked before anything is written, so a
    /// rejected import leaves the state unchanged.
    pub(crate) fn import_catalog(
        &mut self,
        catalog: &Catalog,
    ) -> Result<ImportSummary, StorageError> {
        for entry in &catalog.quizzes {
            let mut seen = HashSet::new();
            for question in &entry.questions {
                if question.quiz_id != entry.quiz.id {
                    return Err(StorageError::Constraint(format!(
                        "question {} belongs to quiz {}, not quiz {}",
                        question.id, question.quiz_id, entry.quiz.id
                    )));
                }
                if !seen.insert(question.id) {
                    return Err(StorageError::Constraint(format!(
                        "quiz {} already has a question {}",
                        entry.quiz.id, question.id
                    )));
                }
            }
        }

        let mut summary = ImportSummary::default();
        for learner in &catalog.learners {
            self.put_learner(learner.clone());
            summary.learners += 1;
        }
        for entry in &catalog.quizzes {
            self.put_quiz(entry.quiz.clone());
            self.questions.insert(entry.quiz.id, entry.questions.clone());
            summary.quizzes += 1;
            summary.questions += entry.questions.len();
        }
        Ok(summary)
    }

    pub(crate) fn insert_submission(
        &mut self,
        submission: NewSubmission,
    ) -> Result<Submission, StorageError> {
        if !self.quizzes.contains_key(&submission.quiz_id) {
            return Err(StorageError::Constraint(format!(
                "submission references unknown quiz {}",
                submission.quiz_id
            )));
        }
        if !self.learners.contains_key(&submission.learner_id) {
            return Err(StorageError::Constraint(format!(
                "submission references unknown learner {}",
                submission.learner_id
            )));
        }
        let submission = submission.into_submission();
        self.submissions.push(submission.clone());
        Ok(submission)
    }

    pub(crate) fn submissions_where(
        &self,
        keep: impl Fn(&Submission) -> bool,
    ) -> Vec<Submission> {
        let mut found: Vec<Submission> = self
            .submissions
            .iter()
            .filter(|s| keep(s))
            .cloned()
            .collect();
        found.sort_by_key(|s| s.submitted_at);
        found
    }

    pub(crate) fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    pub(crate) fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            quizzes: self.quizzes.values().cloned().collect(),
            questions: self.questions.values().flatten().cloned().collect(),
            learners: self.learners.values().cloned().collect(),
            submissions: self.submissions.clone(),
        }
    }

    pub(crate) fn from_snapshot(snapshot: Snapshot) -> Result<Self, StorageError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::Unavailable(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        let mut state = StoreState::default();
        for quiz in snapshot.quizzes {
            state.put_quiz(quiz);
        }
        for learner in snapshot.learners {
            state.put_learner(learner);
        }
        for question in snapshot.questions {
            state.add_question(question)?;
        }
        state.submissions = snapshot.submissions;
        Ok(state)
    }
}
