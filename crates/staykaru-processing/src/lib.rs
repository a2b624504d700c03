//! StayKaru Image Processing Library
//!
//! Validation, resizing, re-encoding and thumbnail generation for uploaded
//! images, plus the orchestrator that runs them per file and stores the result.

pub mod compression;
pub mod error;
pub mod image;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use compression::{detect_mime_type, ImageCompressor, OutputFormat};
pub use error::ProcessingError;
pub use self::image::{FitStrategy, ImageProcessor, ProcessOptions, ProcessedImage, ResizeOptions};
pub use upload::{
    BatchUploadResult, IncomingFile, UploadError, UploadFailure, UploadPresets, UploadService,
};
pub use validator::{ImageValidator, ValidationError};
