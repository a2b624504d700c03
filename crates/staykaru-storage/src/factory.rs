use crate::{LocalStorage, Storage, StorageResult};
use staykaru_core::Config;
use std::sync::Arc;

/// Create the storage backend described by configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(
        config.uploads_root_dir().clone(),
        config.images_url_prefix().to_string(),
    )
    .await?;

    tracing::info!(
        root = %storage.base_path().display(),
        url_prefix = %config.images_url_prefix(),
        "Local image storage initialized"
    );

    Ok(Arc::new(storage))
}
