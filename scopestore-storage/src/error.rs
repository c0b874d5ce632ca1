//! Error types for the storage engine.

use crate::EntryKind;
use thiserror::Error;

/// Result type for storage engine operations.
pub type StoreResult<T> = Result<T, PropertyStoreError>;

/// Errors that can occur in storage engine operations.
#[derive(Debug, Error)]
pub enum PropertyStoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The database could not be opened.
    #[error("connection error: {0}")]
    Connection(#[from] scopestore_db::DbError),

    /// A key was read through a getter of another kind.
    #[error("property {key} is of kind {actual}, not {expected}")]
    TypeMismatch {
        key: String,
        expected: EntryKind,
        actual: EntryKind,
    },

    /// A stored row cannot be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Another thread panicked while holding the connection.
    #[error("connection lock poisoned")]
    LockPoisoned,
}
