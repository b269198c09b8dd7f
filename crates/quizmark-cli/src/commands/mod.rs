pub mod init;
pub mod stats;
pub mod submissions;
pub mod submit;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use quizmark_core::catalog::load_catalog;
use quizmark_core::SubmissionService;
use quizmark_store::{load_config_from, open_store};

/// Load config, open the configured store, and import the catalog if one
/// is configured.
pub async fn open_service(config_path: Option<&Path>) -> Result<SubmissionService> {
    let config = load_config_from(config_path)?;
    tracing::debug!(store = ?config.store, catalog = ?config.catalog, "opening store");
    let store = open_store(&config.store).await?;

    if let Some(catalog_path) = &config.catalog {
        let catalog = load_catalog(catalog_path)?;
        store.import_catalog(&catalog).await?;
    }

    Ok(store.service())
}
