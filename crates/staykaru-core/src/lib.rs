//! StayKaru Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by the storage, processing and API crates of the image upload service.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ImageDimensionsSpec, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ImageDimensions, UploadCategory, UploadedImage};
