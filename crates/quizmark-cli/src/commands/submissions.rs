//! The `quizmark submissions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use quizmark_core::model::{LearnerId, QuizId};

pub async fn execute(
    quiz: Option<u64>,
    learner: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let service = super::open_service(config_path.as_deref()).await?;

    let submissions = match (quiz, learner) {
        (Some(quiz), _) => service.submissions_for_quiz(QuizId(quiz)).await?,
        (None, Some(learner)) => service.submissions_for_learner(LearnerId(learner)).await?,
        (None, None) => anyhow::bail!("either --quiz or --learner is required"),
    };

    if submissions.is_empty() {
        println!("No submissions recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Submission", "Quiz", "Learner", "Score", "Answers", "Submitted"]);
    for s in &submissions {
        table.add_row(vec![
            s.id.to_string(),
            s.quiz_id.to_string(),
            s.learner_id.to_string(),
            s.score.map_or_else(|| "-".to_string(), |score| score.to_string()),
            s.answers.len().to_string(),
            s.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    println!("{table}");
    println!("{} submission(s)", submissions.len());

    Ok(())
}
