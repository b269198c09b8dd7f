//! TOML quiz catalog parser.
//!
//! A catalog lists learners and quizzes with their questions. Catalogs are
//! imported into a store before submissions can be graded against them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Learner, LearnerId, Question, QuestionId, QuestionKind, Quiz, QuizId};

/// A quiz together with the questions it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEntry {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

/// Parsed catalog contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub learners: Vec<Learner>,
    pub quizzes: Vec<QuizEntry>,
}

impl Catalog {
    /// Merge another catalog into this one, appending its entries.
    pub fn extend(&mut self, other: Catalog) {
        self.learners.extend(other.learners);
        self.quizzes.extend(other.quizzes);
    }

    pub fn question_count(&self) -> usize {
        self.quizzes.iter().map(|q| q.questions.len()).sum()
    }
}

/// Intermediate TOML structure for catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    learners: Vec<TomlLearner>,
    #[serde(default)]
    quizzes: Vec<TomlQuiz>,
}

#[derive(Debug, Deserialize)]
struct TomlLearner {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuiz {
    id: u64,
    lesson_id: u64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u64,
    text: String,
    #[serde(default = "default_kind")]
    kind: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
    #[serde(default = "default_points")]
    points: u32,
    #[serde(default)]
    order_index: Option<u32>,
}

fn default_kind() -> String {
    "short_answer".to_string()
}

fn default_points() -> u32 {
    1
}

/// Parse a single TOML catalog file.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalog = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let learners = parsed
        .learners
        .into_iter()
        .map(|l| Learner {
            id: LearnerId(l.id),
            name: l.name,
        })
        .collect();

    let quizzes = parsed
        .quizzes
        .into_iter()
        .map(|q| {
            let quiz_id = QuizId(q.id);
            let questions = q
                .questions
                .into_iter()
                .enumerate()
                .map(|(position, question)| {
                    let kind: QuestionKind = question
                        .kind
                        .parse()
                        .map_err(|e: String| anyhow::anyhow!("quiz {quiz_id}: {e}"))?;
                    anyhow::ensure!(
                        question.points > 0,
                        "quiz {quiz_id}, question {}: points must be positive",
                        question.id
                    );
                    Ok(Question {
                        id: QuestionId(question.id),
                        quiz_id,
                        text: question.text,
                        kind,
                        options: question.options,
                        correct_answer: question.correct_answer,
                        points: question.points,
                        order_index: question.order_index.unwrap_or(position as u32),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(QuizEntry {
                quiz: Quiz {
                    id: quiz_id,
                    lesson_id: q.lesson_id,
                    title: q.title,
                    description: q.description,
                },
                questions,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Catalog { learners, quizzes })
}

/// Recursively load and merge all `.toml` catalog files in a directory.
pub fn load_catalog_directory(dir: &Path) -> Result<Catalog> {
    let mut catalog = Catalog::default();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            catalog.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(parsed) => catalog.extend(parsed),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(catalog)
}

/// Load a catalog from a file or a directory of files.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if path.is_dir() {
        load_catalog_directory(path)
    } else {
        parse_catalog(path)
    }
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct CatalogWarning {
    /// The quiz the warning concerns (if any).
    pub quiz_id: Option<QuizId>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common authoring mistakes.
pub fn validate_catalog(catalog: &Catalog) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();

    let mut seen_learners = HashSet::new();
    for learner in &catalog.learners {
        if !seen_learners.insert(learner.id) {
            warnings.push(CatalogWarning {
                quiz_id: None,
                message: format!("duplicate learner ID: {}", learner.id),
            });
        }
    }

    let mut seen_quizzes = HashSet::new();
    for entry in &catalog.quizzes {
        let quiz_id = entry.quiz.id;
        let mut warn = |message: String| {
            warnings.push(CatalogWarning {
                quiz_id: Some(quiz_id),
                message,
            })
        };

        if !seen_quizzes.insert(quiz_id) {
            warn(format!("duplicate quiz ID: {quiz_id}"));
        }

        if entry.questions.is_empty() {
            warn("quiz has no questions; every submission will score 0".into());
        }

        let mut seen_questions = HashSet::new();
        for question in &entry.questions {
            let qid = question.id;
            if !seen_questions.insert(qid) {
                warn(format!("duplicate question ID: {qid}"));
            }
            if question.text.trim().is_empty() {
                warn(format!("question {qid}: text is empty"));
            }
            if question.kind.is_choice() && question.options.is_empty() {
                warn(format!("question {qid}: {} question has no options", question.kind));
            } else if question.kind.is_choice()
                && !question.options.contains(&question.correct_answer)
            {
                warn(format!(
                    "question {qid}: correct answer {:?} is not one of the options",
                    question.correct_answer
                ));
            }
            if question.kind == QuestionKind::TrueFalse
                && !matches!(question.correct_answer.as_str(), "true" | "false")
            {
                warn(format!(
                    "question {qid}: true/false answer should be \"true\" or \"false\", got {:?}",
                    question.correct_answer
                ));
            }
        }
    }

    warnings
}
