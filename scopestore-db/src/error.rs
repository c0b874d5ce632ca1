//! Error types for connection management.

use thiserror::Error;

/// Result type for connection operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur while opening or configuring a database.
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLite.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error (creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid database config: {0}")]
    Config(String),
}
