//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A database error occurred in the relational backend.
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The persisted data is malformed.
    #[error("storage corrupted: {0}")]
    Corrupted(String),

    /// No table or record layout is known for the given kind.
    #[error("unknown record kind: {0}")]
    UnknownKind(String),

    /// The storage is closed.
    #[error("storage is closed")]
    Closed,
}
