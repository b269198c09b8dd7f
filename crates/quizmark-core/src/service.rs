//! Submission service.
//!
//! Validates that the quiz and learner exist, grades the answer sheet
//! against the quiz's questions, and records exactly one submission.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answers::AnswerSheet;
use crate::error::{GradingError, Resource};
use crate::grader::GradeBreakdown;
use crate::model::{LearnerId, NewSubmission, QuizId, Submission};
use crate::statistics::QuizStats;
use crate::traits::{LearnerDirectory, QuestionStore, SubmissionRecorder};

/// A recorded submission together with how it was graded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedSubmission {
    pub submission: Submission,
    pub breakdown: GradeBreakdown,
}

/// Grades and records quiz submissions.
#[derive(Clone)]
pub struct SubmissionService {
    questions: Arc<dyn QuestionStore>,
    learners: Arc<dyn LearnerDirectory>,
    recorder: Arc<dyn SubmissionRecorder>,
}

impl SubmissionService {
    pub fn new(
        questions: Arc<dyn QuestionStore>,
        learners: Arc<dyn LearnerDirectory>,
        recorder: Arc<dyn SubmissionRecorder>,
    ) -> Self {
        Self {
            questions,
            learners,
            recorder,
        }
    }

    /// Build a service on a backend that implements every collaborator.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: QuestionStore + LearnerDirectory + SubmissionRecorder + 'static,
    {
        Self {
            questions: store.clone(),
            learners: store.clone(),
            recorder: store,
        }
    }

    /// Grade `answers` against `quiz` and record the submission.
    pub async fn submit_quiz(
        &self,
        quiz: QuizId,
        learner: LearnerId,
        answers: AnswerSheet,
    ) -> Result<Submission, GradingError> {
        self.submit_quiz_detailed(quiz, learner, answers)
            .await
            .map(|graded| graded.submission)
    }

    /// Like [`submit_quiz`](Self::submit_quiz), but takes an untyped JSON
    /// answer document and validates it before touching storage.
    pub async fn submit_quiz_json(
        &self,
        quiz: QuizId,
        learner: LearnerId,
        answers: &Value,
    ) -> Result<Submission, GradingError> {
        let answers = AnswerSheet::from_json(answers).inspect_err(|e| {
            tracing::warn!(%quiz, %learner, "rejected answer sheet: {e}");
        })?;
        self.submit_quiz(quiz, learner, answers).await
    }

    /// Grade and record, returning the per-question breakdown as well.
    pub async fn submit_quiz_detailed(
        &self,
        quiz: QuizId,
        learner: LearnerId,
        answers: AnswerSheet,
    ) -> Result<GradedSubmission, GradingError> {
        let (found_quiz, learner_known, questions) = futures::try_join!(
            self.questions.fetch_quiz(quiz),
            self.learners.learner_exists(learner),
            self.questions.fetch_questions_by_quiz(quiz),
        )?;

        if found_quiz.is_none() {
            return Err(GradingError::NotFound(Resource::Quiz(quiz)));
        }
        if !learner_known {
            return Err(GradingError::NotFound(Resource::Learner(learner)));
        }
        tracing::debug!(%quiz, %learner, questions = questions.len(), "grading submission");

        let breakdown = GradeBreakdown::compute(&questions, &answers);

        let submission = self
            .recorder
            .insert_submission(NewSubmission {
                quiz_id: quiz,
                learner_id: learner,
                answers,
                score: Some(breakdown.score),
                submitted_at: Some(Utc::now()),
            })
            .await?;

        tracing::info!(
            %quiz,
            %learner,
            submission = %submission.id,
            score = breakdown.score,
            max_score = breakdown.max_score,
            "submission recorded"
        );

        Ok(GradedSubmission {
            submission,
            breakdown,
        })
    }

    /// Every recorded submission for a quiz, oldest first.
    pub async fn submissions_for_quiz(
        &self,
        quiz: QuizId,
    ) -> Result<Vec<Submission>, GradingError> {
        if self.questions.fetch_quiz(quiz).await?.is_none() {
            return Err(GradingError::NotFound(Resource::Quiz(quiz)));
        }
        Ok(self.recorder.submissions_for_quiz(quiz).await?)
    }

    /// Every recorded submission by a learner, oldest first.
    pub async fn submissions_for_learner(
        &self,
        learner: LearnerId,
    ) -> Result<Vec<Submission>, GradingError> {
        if !self.learners.learner_exists(learner).await? {
            return Err(GradingError::NotFound(Resource::Learner(learner)));
        }
        Ok(self.recorder.submissions_for_learner(learner).await?)
    }

    /// Aggregate statistics over a quiz's recorded submissions.
    pub async fn quiz_stats(&self, quiz: QuizId) -> Result<QuizStats, GradingError> {
        let (found_quiz, questions, submissions) = futures::try_join!(
            self.questions.fetch_quiz(quiz),
            self.questions.fetch_questions_by_quiz(quiz),
            self.recorder.submissions_for_quiz(quiz),
        )?;
        if found_quiz.is_none() {
            return Err(GradingError::NotFound(Resource::Quiz(quiz)));
        }
        let max_score = questions.iter().map(|q| u64::from(q.points)).sum();
        Ok(QuizStats::compute(quiz, &submissions, max_score))
    }
}
