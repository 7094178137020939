use thiserror::Error;

use crate::cache::SerializationError;

/// Errors that can occur while talking to the remote document store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Returns true for the not-found variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<SerializationError> for StoreError {
    fn from(err: SerializationError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in persistent key-value storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("Storage I/O failed: {0}")]
    Io(String),
}

/// Result type for key-value storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
