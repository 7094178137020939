use thiserror::Error;

/// Errors raised when validating planned-post input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannedPostError {
    #[error("Planned post title cannot be empty")]
    EmptyTitle,
    #[error("Planned post title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Estimated read time must be at least one minute")]
    InvalidReadTime,
}
