//! Processing and upload error types

use greenmate_core::ErrorKind;
use greenmate_storage::StorageError;

use crate::validator::ValidationError;

/// Image normalization errors
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Unsupported output format: {0} (expected jpeg, png or webp)")]
    UnsupportedFormat(String),

    #[error("Image processing failed: {0}")]
    ImageProcessingFailed(String),
}

impl ProcessingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessingError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            ProcessingError::ImageProcessingFailed(_) => ErrorKind::ImageProcessingFailed,
        }
    }
}

impl From<image::ImageError> for ProcessingError {
    fn from(err: image::ImageError) -> Self {
        ProcessingError::ImageProcessingFailed(err.to_string())
    }
}

impl From<std::io::Error> for ProcessingError {
    fn from(err: std::io::Error) -> Self {
        ProcessingError::ImageProcessingFailed(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ProcessingError {
    fn from(err: tokio::task::JoinError) -> Self {
        ProcessingError::ImageProcessingFailed(format!("Image task failed: {}", err))
    }
}

/// Errors from the full upload flow
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::Validation(e) => e.kind(),
            UploadError::Processing(e) => e.kind(),
            UploadError::Storage(_) => ErrorKind::StorageFailed,
        }
    }
}

impl From<tokio::task::JoinError> for UploadError {
    fn from(err: tokio::task::JoinError) -> Self {
        UploadError::Processing(err.into())
    }
}
