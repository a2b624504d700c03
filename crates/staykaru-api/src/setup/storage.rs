//! Storage setup and initialization

use anyhow::{Context, Result};
use staykaru_core::Config;
use staykaru_storage::{create_storage, Storage};
use std::sync::Arc;

/// Create the uploads root and make sure it is writable before serving traffic
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(root = %config.uploads_root_dir().display(), "Initializing image storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to create image storage")?;

    storage
        .health_check()
        .await
        .context("Uploads root is not writable")?;

    tracing::info!("Image storage initialized successfully");
    Ok(storage)
}
