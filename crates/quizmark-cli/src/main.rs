//! quizmark CLI — grade quiz submissions and inspect their history.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizmark", version, about = "Quiz grading and submission records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a learner's answers and record the submission
    Submit {
        /// Quiz to grade against
        #[arg(long)]
        quiz: u64,

        /// Learner submitting the answers
        #[arg(long)]
        learner: u64,

        /// Answers as a JSON object, e.g. '{"1": "4", "2": "true"}'
        #[arg(long, conflicts_with = "answers_file", required_unless_present = "answers_file")]
        answers: Option<String>,

        /// Read the answers JSON from a file
        #[arg(long)]
        answers_file: Option<PathBuf>,

        /// Output format: json, text
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List recorded submissions
    Submissions {
        /// Only submissions for this quiz
        #[arg(long, conflicts_with = "learner", required_unless_present = "learner")]
        quiz: Option<u64>,

        /// Only submissions by this learner
        #[arg(long)]
        learner: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show score statistics for a quiz
    Stats {
        /// Quiz to summarize
        #[arg(long)]
        quiz: u64,

        /// Output format: json, text
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate quiz catalog TOML files
    Validate {
        /// Path to catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Create starter config and example catalog
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizmark=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Submit {
            quiz,
            learner,
            answers,
            answers_file,
            format,
            config,
        } => commands::submit::execute(quiz, learner, answers, answers_file, format, config).await,
        Commands::Submissions {
            quiz,
            learner,
            config,
        } => commands::submissions::execute(quiz, learner, config).await,
        Commands::Stats {
            quiz,
            format,
            config,
        } => commands::stats::execute(quiz, format, config).await,
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
