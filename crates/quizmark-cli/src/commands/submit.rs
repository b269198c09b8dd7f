//! The `quizmark submit` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizmark_core::grader::Outcome;
use quizmark_core::model::{LearnerId, QuizId};
use quizmark_core::AnswerSheet;

pub async fn execute(
    quiz: u64,
    learner: u64,
    answers: Option<String>,
    answers_file: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let raw = match (answers, answers_file) {
        (Some(inline), _) => inline,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read answers file: {}", path.display()))?,
        (None, None) => anyhow::bail!("either --answers or --answers-file is required"),
    };
    // Reject a malformed sheet before the store is even opened.
    let answers = AnswerSheet::from_json_str(&raw)?;

    let service = super::open_service(config_path.as_deref()).await?;
    let graded = service
        .submit_quiz_detailed(QuizId(quiz), LearnerId(learner), answers)
        .await?;

    match format.as_str() {
        "text" => {
            let submission = &graded.submission;
            let breakdown = &graded.breakdown;
            println!("Submission {}", submission.id);
            println!(
                "  quiz {} / learner {} at {}",
                submission.quiz_id,
                submission.learner_id,
                submission.submitted_at.to_rfc3339()
            );
            println!(
                "  score {}/{} ({} of {} correct)",
                breakdown.score, breakdown.max_score, breakdown.correct, breakdown.total_questions
            );
            for outcome in &breakdown.outcomes {
                let label = match outcome.outcome {
                    Outcome::Correct => "correct",
                    Outcome::Incorrect => "incorrect",
                    Outcome::Unanswered => "unanswered",
                };
                println!(
                    "  question {}: {label} ({}/{})",
                    outcome.question_id, outcome.points_awarded, outcome.points_possible
                );
            }
            if breakdown.unmatched_answers > 0 {
                println!(
                    "  {} answer(s) did not match any question",
                    breakdown.unmatched_answers
                );
            }
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(&graded)?);
        }
    }

    Ok(())
}
