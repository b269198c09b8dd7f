//! Core data model types for quizmark.
//!
//! Quizzes own their questions; learners own their submissions. Identifiers
//! are numeric newtypes so a question id can never be passed where a quiz id
//! is expected.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answers::AnswerSheet;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = String;

            /// Accepts only the canonical decimal form: no sign, no
            /// whitespace, no leading zeros.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_canonical_u64(s).map(Self)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a quiz.
    QuizId
);
numeric_id!(
    /// Identifier of a question, unique within its quiz.
    QuestionId
);
numeric_id!(
    /// Identifier of a learner (a user who takes quizzes).
    LearnerId
);

fn parse_canonical_u64(s: &str) -> Result<u64, String> {
    let canonical = !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s == "0" || !s.starts_with('0'));
    if !canonical {
        return Err(format!("not a canonical numeric id: {s:?}"));
    }
    s.parse::<u64>()
        .map_err(|_| format!("numeric id out of range: {s:?}"))
}

/// Identifier of a recorded submission, assigned by the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named collection of questions attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    /// Lesson this quiz belongs to.
    pub lesson_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// The closed set of question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionKind {
    /// Whether answers are picked from the question's option list.
    pub fn is_choice(self) -> bool {
        matches!(self, QuestionKind::MultipleChoice | QuestionKind::TrueFalse)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "multiple_choice"),
            QuestionKind::TrueFalse => write!(f, "true_false"),
            QuestionKind::ShortAnswer => write!(f, "short_answer"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple_choice" | "multiple-choice" | "mcq" => Ok(QuestionKind::MultipleChoice),
            "true_false" | "true-false" | "boolean" => Ok(QuestionKind::TrueFalse),
            "short_answer" | "short-answer" | "text" => Ok(QuestionKind::ShortAnswer),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// A single gradable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub quiz_id: QuizId,
    pub text: String,
    pub kind: QuestionKind,
    /// Answer options in display order (choice kinds only).
    #[serde(default)]
    pub options: Vec<String>,
    /// The one answer string that earns the points.
    pub correct_answer: String,
    /// Points awarded for a correct answer. Always positive.
    pub points: u32,
    /// Position of the question when the quiz is displayed.
    #[serde(default)]
    pub order_index: u32,
}

/// A user who takes quizzes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub id: LearnerId,
    pub name: String,
}

/// A learner's graded attempt at a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub quiz_id: QuizId,
    pub learner_id: LearnerId,
    /// The answer mapping exactly as the learner supplied it.
    pub answers: AnswerSheet,
    /// `None` until graded.
    pub score: Option<u64>,
    pub submitted_at: DateTime<Utc>,
}

/// Fields needed to record a submission. The recorder assigns the id, and
/// the timestamp when `submitted_at` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub quiz_id: QuizId,
    pub learner_id: LearnerId,
    pub answers: AnswerSheet,
    pub score: Option<u64>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl NewSubmission {
    /// Materialize the record with a fresh id.
    pub fn into_submission(self) -> Submission {
        Submission {
            id: SubmissionId::new_v4(),
            quiz_id: self.quiz_id,
            learner_id: self.learner_id,
            answers: self.answers,
            score: self.score,
            submitted_at: self.submitted_at.unwrap_or_else(Utc::now),
        }
    }
}
