//! Upload orchestrator: validate → stage → process → collect, per file.

mod guard;
pub mod naming;
pub mod presets;
mod service;
pub mod types;

pub use naming::{generate_filename, sanitize_filename};
pub use presets::UploadPresets;
pub use service::UploadService;
pub use types::{BatchUploadResult, IncomingFile, UploadError, UploadFailure};
