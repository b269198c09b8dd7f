//! Deterministic quiz grading.
//!
//! A question earns its points only when the answer sheet holds an entry
//! for its id that is byte-for-byte equal to the stored correct answer.
//! Entries for unknown question ids are never looked at.

use serde::{Deserialize, Serialize};

use crate::answers::AnswerSheet;
use crate::model::{Question, QuestionId};

/// Sum of the points of every correctly answered question.
pub fn grade(questions: &[Question], answers: &AnswerSheet) -> u64 {
    questions
        .iter()
        .filter(|q| is_correct(q, answers))
        .map(|q| u64::from(q.points))
        .sum()
}

fn is_correct(question: &Question, answers: &AnswerSheet) -> bool {
    answers
        .get(question.id)
        .is_some_and(|answer| answer == question.correct_answer)
}

/// How a single question was graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    Unanswered,
}

/// Grading result for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub outcome: Outcome,
    pub points_awarded: u32,
    pub points_possible: u32,
}

/// Full grading breakdown of an answer sheet against a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeBreakdown {
    /// Total points earned. Always equal to [`grade`] on the same input.
    pub score: u64,
    /// Points available if every question were answered correctly.
    pub max_score: u64,
    pub total_questions: usize,
    pub answered: usize,
    pub correct: usize,
    /// Answer entries whose key matches no question of the quiz.
    pub unmatched_answers: usize,
    /// Per-question outcomes in display order.
    pub outcomes: Vec<QuestionOutcome>,
}

impl GradeBreakdown {
    pub fn compute(questions: &[Question], answers: &AnswerSheet) -> Self {
        let mut ordered: Vec<&Question> = questions.iter().collect();
        ordered.sort_by_key(|q| (q.order_index, q.id));

        let mut outcomes = Vec::with_capacity(ordered.len());
        let mut score = 0u64;
        let mut max_score = 0u64;
        let mut answered = 0usize;
        let mut correct = 0usize;

        for question in ordered {
            max_score += u64::from(question.points);
            let outcome = match answers.get(question.id) {
                None => Outcome::Unanswered,
                Some(answer) if answer == question.correct_answer => Outcome::Correct,
                Some(_) => Outcome::Incorrect,
            };
            if outcome != Outcome::Unanswered {
                answered += 1;
            }
            let points_awarded = if outcome == Outcome::Correct {
                correct += 1;
                score += u64::from(question.points);
                question.points
            } else {
                0
            };
            outcomes.push(QuestionOutcome {
                question_id: question.id,
                outcome,
                points_awarded,
                points_possible: question.points,
            });
        }

        let unmatched_answers = answers
            .iter()
            .filter(|(id, _)| !questions.iter().any(|q| q.id == *id))
            .count();

        Self {
            score,
            max_score,
            total_questions: questions.len(),
            answered,
            correct,
            unmatched_answers,
            outcomes,
        }
    }

    /// Fraction of available points earned, 0.0 for an empty quiz.
    pub fn ratio(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        self.score as f64 / self.max_score as f64
    }
}
