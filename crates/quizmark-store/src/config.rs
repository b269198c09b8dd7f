//! Store configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizmark_core::catalog::Catalog;
use quizmark_core::SubmissionService;

use crate::json_file::JsonFileStore;
use crate::memory::InMemoryStore;
use crate::state::ImportSummary;

/// Which backend holds quizzes, learners, and submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Nothing survives the process.
    Memory,
    /// A single JSON snapshot file.
    JsonFile {
        #[serde(default = "default_data_file")]
        path: PathBuf,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::JsonFile {
            path: default_data_file(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./quizmark-data/store.json")
}

/// Top-level quizmark configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizmarkConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Catalog file or directory imported into the store on startup.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied through as-is, so a value that itself
/// contains `${...}` is not expanded again.
fn resolve_env_vars(s: &str) -> String {
    resolve_with(s, |name| std::env::var(name).ok())
}

fn resolve_with(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&lookup(&rest[start + 2..start + end]).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Apply `QUIZMARK_DATA_FILE` / `QUIZMARK_CATALOG` style overrides using
/// `lookup` to read variables.
fn apply_overrides(config: &mut QuizmarkConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(path) = lookup("QUIZMARK_DATA_FILE").filter(|p| !p.is_empty()) {
        config.store = StoreConfig::JsonFile {
            path: PathBuf::from(path),
        };
    }
    if let Some(path) = lookup("QUIZMARK_CATALOG").filter(|p| !p.is_empty()) {
        config.catalog = Some(PathBuf::from(path));
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizmark.toml` in the current directory
/// 2. `~/.config/quizmark/config.toml`
///
/// Environment variable overrides: `QUIZMARK_DATA_FILE`, `QUIZMARK_CATALOG`.
pub fn load_config() -> Result<QuizmarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizmarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizmark.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizmarkConfig::default(),
    };

    apply_overrides(&mut config, |name| std::env::var(name).ok());

    Ok(config)
}

/// Parse a TOML config document and resolve `${VAR}` references in paths.
pub fn parse_config_str(content: &str) -> Result<QuizmarkConfig> {
    let mut config: QuizmarkConfig = toml::from_str(content)?;
    if let StoreConfig::JsonFile { path } = &mut config.store {
        *path = resolve_path(path);
    }
    config.catalog = config.catalog.as_deref().map(resolve_path);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizmark"))
}

/// An opened backend.
#[derive(Clone)]
pub enum StoreHandle {
    Memory(Arc<InMemoryStore>),
    JsonFile(Arc<JsonFileStore>),
}

impl StoreHandle {
    /// A submission service running on this backend.
    pub fn service(&self) -> SubmissionService {
        match self {
            StoreHandle::Memory(store) => SubmissionService::from_store(Arc::clone(store)),
            StoreHandle::JsonFile(store) => SubmissionService::from_store(Arc::clone(store)),
        }
    }

    pub async fn import_catalog(&self, catalog: &Catalog) -> Result<ImportSummary> {
        let summary = match self {
            StoreHandle::Memory(store) => store
                .import_catalog(catalog)
                .await
                .context("failed to import catalog into memory store")?,
            StoreHandle::JsonFile(store) => store
                .import_catalog(catalog)
                .await
                .with_context(|| {
                    format!("failed to import catalog into {}", store.path().display())
                })?,
        };
        tracing::debug!(
            quizzes = summary.quizzes,
            questions = summary.questions,
            learners = summary.learners,
            "catalog imported"
        );
        Ok(summary)
    }
}

/// Open the backend described by `config`.
pub async fn open_store(config: &StoreConfig) -> Result<StoreHandle> {
    match config {
        StoreConfig::Memory => Ok(StoreHandle::Memory(Arc::new(InMemoryStore::new()))),
        StoreConfig::JsonFile { path } => {
            let store = JsonFileStore::open(path.clone())
                .await
                .with_context(|| format!("failed to open store: {}", path.display()))?;
            Ok(StoreHandle::JsonFile(Arc::new(store)))
        }
    }
}
