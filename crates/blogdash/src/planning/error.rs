use thiserror::Error;

use blogdash_core::planning::PlannedPostError;
use blogdash_core::storage::StorageError;

/// Errors returned by the planning store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("Stored planned posts are corrupt: {0}")]
    Corrupt(String),
    #[error("Failed to encode planned posts: {0}")]
    Encode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Invalid(#[from] PlannedPostError),
}
