//! Aggregate statistics over recorded submissions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{LearnerId, QuizId, Submission};

/// Summary of every graded submission recorded for one quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStats {
    pub quiz_id: QuizId,
    /// Number of graded submissions.
    pub attempts: usize,
    /// Distinct learners with at least one graded submission.
    pub learners: usize,
    /// Points available on the quiz as it stands now.
    pub max_score: u64,
    pub mean_score: f64,
    pub best_score: Option<u64>,
    pub lowest_score: Option<u64>,
    /// Best score per learner.
    pub best_by_learner: BTreeMap<LearnerId, u64>,
}

impl QuizStats {
    /// Compute stats for `quiz`. Submissions for other quizzes and
    /// ungraded submissions are skipped.
    pub fn compute(quiz: QuizId, submissions: &[Submission], max_score: u64) -> Self {
        let graded: Vec<(LearnerId, u64)> = submissions
            .iter()
            .filter(|s| s.quiz_id == quiz)
            .filter_map(|s| s.score.map(|score| (s.learner_id, score)))
            .collect();

        let mut best_by_learner: BTreeMap<LearnerId, u64> = BTreeMap::new();
        for &(learner, score) in &graded {
            let best = best_by_learner.entry(learner).or_insert(score);
            if score > *best {
                *best = score;
            }
        }

        let total: u64 = graded.iter().map(|&(_, score)| score).sum();
        let mean_score = if graded.is_empty() {
            0.0
        } else {
            total as f64 / graded.len() as f64
        };

        Self {
            quiz_id: quiz,
            attempts: graded.len(),
            learners: best_by_learner.len(),
            max_score,
            mean_score,
            best_score: graded.iter().map(|&(_, score)| score).max(),
            lowest_score: graded.iter().map(|&(_, score)| score).min(),
            best_by_learner,
        }
    }
}
