//! quizmark-store — Persistence backends for quizmark.
//!
//! Implements the `QuestionStore`, `LearnerDirectory`, and
//! `SubmissionRecorder` traits from `quizmark-core` for an in-memory store
//! and a store that snapshots its state to a JSON file.

pub mod config;
pub mod json_file;
pub mod memory;
mod state;

pub use config::{
    load_config, load_config_from, open_store, QuizmarkConfig, StoreConfig, StoreHandle,
};
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
pub use state::ImportSummary;
