use thiserror::Error;

/// Errors raised when validating post input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("Post title cannot be empty")]
    EmptyTitle,
    #[error("Post title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),
    #[error("Cannot derive a slug from the title; provide one explicitly")]
    SlugRequired,
    #[error("Page numbers start at 1")]
    InvalidPage,
    #[error("Page size must be between 1 and 100")]
    InvalidLimit,
    #[error("Start of range must not be after its end")]
    InvalidDateRange,
    #[error("Saved search name cannot be empty")]
    EmptySearchName,
    #[error("At least one tag is required")]
    NoTags,
}
