//! Types for the upload orchestrator.

use bytes::Bytes;
use staykaru_core::UploadedImage;
use staykaru_storage::StorageError;

use crate::error::ProcessingError;
use crate::validator::ValidationError;

/// One file received from the client, before validation.
#[derive(Clone, Debug)]
pub struct IncomingFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl IncomingFile {
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Why a single file could not be uploaded
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Processing(ProcessingError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ProcessingError> for UploadError {
    fn from(err: ProcessingError) -> Self {
        match err {
            // A failed write is a disk problem, not a bad image.
            ProcessingError::Write { path, source } => UploadError::Storage(
                StorageError::WriteFailed(format!("{}: {}", path.display(), source)),
            ),
            other => UploadError::Processing(other),
        }
    }
}

/// A file that failed, with the name the client sent.
#[derive(Debug)]
pub struct UploadFailure {
    pub original_name: String,
    pub error: UploadError,
}

impl std::fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.original_name, self.error)
    }
}

/// Aggregate result of a batch upload
#[derive(Debug, Default)]
pub struct BatchUploadResult {
    /// `true` when no file failed
    pub success: bool,
    /// Successful uploads, in input order
    pub images: Vec<UploadedImage>,
    /// `"<original name>: <reason>"` per failed file, in input order
    pub errors: Vec<String>,
    /// Typed failures behind `errors`
    pub failures: Vec<UploadFailure>,
}

impl BatchUploadResult {
    pub(crate) fn from_outcomes(outcomes: Vec<Result<UploadedImage, UploadFailure>>) -> Self {
        let mut result = BatchUploadResult::default();
        for outcome in outcomes {
            match outcome {
                Ok(image) => result.images.push(image),
                Err(failure) => {
                    result.errors.push(failure.to_string());
                    result.failures.push(failure);
                }
            }
        }
        result.success = result.failures.is_empty();
        result
    }
}
