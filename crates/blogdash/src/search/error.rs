use thiserror::Error;

use blogdash_core::posts::PostError;
use blogdash_core::storage::StorageError;

/// Errors returned by the saved search store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Stored searches are corrupt: {0}")]
    Corrupt(String),
    #[error("Failed to encode saved searches: {0}")]
    Encode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Invalid(#[from] PostError),
}
