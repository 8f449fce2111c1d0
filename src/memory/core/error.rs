// src/memory/core/error.rs

use thiserror::Error;

/// Failure of the backing store or a transaction. This is the only error
/// that crosses the conversation-manager boundary; callers surface it as
/// a "try again" reply. Classifier failures never reach here — the
/// adapter absorbs them into conservative defaults.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
