//! The `quizmark stats` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmark_core::model::QuizId;

pub async fn execute(quiz: u64, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let service = super::open_service(config_path.as_deref()).await?;
    let stats = service.quiz_stats(QuizId(quiz)).await?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        _ => {
            println!(
                "Quiz {}: {} attempt(s) by {} learner(s)",
                stats.quiz_id, stats.attempts, stats.learners
            );
            println!("  max score {}", stats.max_score);
            if let (Some(best), Some(lowest)) = (stats.best_score, stats.lowest_score) {
                println!("  mean {:.2}, best {best}, lowest {lowest}", stats.mean_score);
            }
            for (learner, best) in &stats.best_by_learner {
                println!("  learner {learner}: best {best}");
            }
        }
    }

    Ok(())
}
