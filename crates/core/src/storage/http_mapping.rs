//! Pure functions for mapping HTTP responses of the document store API to
//! [`StoreError`] variants.

use super::StoreError;

/// Maps a non-success HTTP status code to a [`StoreError`].
///
/// - `401`, `403` -> `Unauthorized`
/// - `404` -> `NotFound`
/// - `409` -> `AlreadyExists`
/// - `400`, `422` -> `QueryFailed`
/// - `5xx` and `429` -> `ConnectionFailed`
/// - anything else -> `QueryFailed`
///
/// # Examples
///
/// ```
/// use blogdash_core::storage::{store_error_from_status, StoreError};
///
/// let error = store_error_from_status(404, "post-1", "Document not found");
/// assert!(error.is_not_found());
/// ```
pub fn store_error_from_status(status: u16, id: &str, message: &str) -> StoreError {
    match status {
        401 | 403 => StoreError::Unauthorized(message.to_string()),
        404 => StoreError::NotFound {
            entity_type: "Document",
            id: id.to_string(),
        },
        409 => StoreError::AlreadyExists {
            entity_type: "Document",
            id: id.to_string(),
        },
        429 | 500..=599 => StoreError::ConnectionFailed(format!("{status}: {message}")),
        _ => StoreError::QueryFailed(format!("{status}: {message}")),
    }
}
