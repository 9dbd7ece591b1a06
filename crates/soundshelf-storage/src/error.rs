//! Storage operation errors

use soundshelf_core::ConfigError;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Storage operation errors
///
/// Each variant names the operation that failed and keeps the transport or
/// service error that caused it as its source.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed for '{key}': {source}")]
    UploadFailed {
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Delete failed for '{key}': {source}")]
    DeleteFailed {
        key: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Listing bucket failed: {source}")]
    ListFailed {
        #[source]
        source: object_store::Error,
    },

    #[error("Streaming '{key}' failed: {source}")]
    StreamFailed {
        key: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Cleanup failed after removing {} file(s): {source}", removed.len())]
    CleanupFailed {
        /// Names deleted before the failure; these are not restored
        removed: Vec<String>,
        #[source]
        source: Box<StorageError>,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] object_store::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Whether the underlying service reported the object as missing
    pub fn is_not_found(&self) -> bool {
        match self {
            StorageError::DeleteFailed { source, .. }
            | StorageError::ListFailed { source }
            | StorageError::StreamFailed { source, .. }
            | StorageError::Backend(source) => {
                matches!(source, object_store::Error::NotFound { .. })
            }
            StorageError::CleanupFailed { source, .. } => source.is_not_found(),
            StorageError::UploadFailed { .. }
            | StorageError::InvalidKey(_)
            | StorageError::IoError(_)
            | StorageError::Config(_) => false,
        }
    }
}
