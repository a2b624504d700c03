//! Storage abstraction trait
//!
//! This module defines the Storage trait that image storage backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use staykaru_core::UploadCategory;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked body of a stored file.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// Files are addressed by `(filename, category)`. The processor writes to the
/// path returned by `path_for`; everything else goes through the trait.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Physical location of a file. Validates the filename.
    fn path_for(&self, filename: &str, category: UploadCategory) -> StorageResult<PathBuf>;

    /// Public URL of a file, e.g. `/images/accommodations/<filename>`.
    fn url_for(&self, filename: &str, category: UploadCategory) -> String;

    /// Create the category directory if needed and return it.
    async fn ensure_category_dir(&self, category: UploadCategory) -> StorageResult<PathBuf>;

    /// Check if a file exists
    async fn exists(&self, filename: &str, category: UploadCategory) -> StorageResult<bool>;

    /// Read a whole file into memory
    async fn read(&self, filename: &str, category: UploadCategory) -> StorageResult<Vec<u8>>;

    /// Read a file as a stream of chunks
    async fn read_stream(
        &self,
        filename: &str,
        category: UploadCategory,
    ) -> StorageResult<ByteStream>;

    /// Delete a file and its thumbnail.
    ///
    /// A missing main file is `StorageError::NotFound`. A missing thumbnail is
    /// not an error.
    async fn delete(&self, filename: &str, category: UploadCategory) -> StorageResult<()>;

    /// Verify the storage root accepts writes
    async fn health_check(&self) -> StorageResult<()>;
}
