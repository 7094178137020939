//! Export of posts and planned posts to CSV and JSON.

mod csv;
mod summary;

use serde::Serialize;
use thiserror::Error;

pub use csv::{planned_posts_to_csv, posts_to_csv, quote_field};
pub use summary::{summarize_content, ContentSummary, TagCount};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Failed to encode export: {0}")]
    Encode(String),
}

/// Renders any exportable value as pretty-printed JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    serde_json::to_string_pretty(value).map_err(|e| ExportError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::demo_posts;

    #[test]
    fn test_to_pretty_json() {
        let json = to_pretty_json(&demo_posts()[..1]).unwrap();
        assert!(json.starts_with("[\n  {"));
        assert!(json.contains("\"_id\": \"demo-1\""));
    }

    #[test]
    fn test_export_error_display() {
        assert_eq!(
            ExportError::Encode("bad".to_string()).to_string(),
            "Failed to encode export: bad"
        );
    }
}
