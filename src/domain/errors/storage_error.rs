//! Key-value storage error types.

use thiserror::Error;

/// Storage error variants.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage is closed")]
    Closed,
}
