use thiserror::Error;

/// Errors that can occur when building calendar ranges.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Start date must be before or equal to end date")]
    InvalidRange,
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}
