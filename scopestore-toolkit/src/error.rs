//! Error types for the storage toolkit.

use scopestore_storage::PropertyStoreError;
use thiserror::Error;

/// Result type for toolkit operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by facades, scopes and bridges.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing engine failed.
    #[error("storage engine error: {0}")]
    Engine(#[from] PropertyStoreError),

    /// A structured value could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A decimal key holds text that does not parse as a decimal.
    #[error("property {key} holds invalid decimal {value:?}")]
    InvalidDecimal { key: String, value: String },

    /// A scope was built without one of its ingredients.
    #[error("scope is missing its {0} rule")]
    IncompleteScope(&'static str),
}
