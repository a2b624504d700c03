//! Application state shared by every handler.

use staykaru_core::Config;
use staykaru_processing::{UploadPresets, UploadService};
use staykaru_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub upload_service: UploadService,
    /// Resize/quality defaults per upload category
    pub presets: UploadPresets,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let validator =
            staykaru_processing::ImageValidator::new(config.max_file_size_bytes());
        let upload_service = UploadService::new(storage.clone(), validator);
        let presets = UploadPresets::from_config(&config.upload);

        Self {
            config,
            storage,
            upload_service,
            presets,
        }
    }
}
