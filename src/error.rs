//! Error types for the synchronization engine.

use crate::store::Collection;
use thiserror::Error;

/// Main error type for fetch and reconciliation operations.
///
/// Every asynchronous boundary catches and terminates its own error
/// locally; no `SyncError` is ever rethrown out of a view.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("row not found in {collection}: {key}")]
    MissingRow { collection: Collection, key: String },

    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Decode(e.to_string())
    }
}

/// Result type for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;
