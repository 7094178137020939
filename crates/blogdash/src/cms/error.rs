use thiserror::Error;

use blogdash_core::posts::PostError;
use blogdash_core::storage::StoreError;

/// Errors returned by the CMS access layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CmsError {
    #[error("Mutations are disabled in demo mode")]
    DemoMode,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Invalid post: {0}")]
    Invalid(#[from] PostError),
}
