//! Rendering of command results for the terminal.

pub mod pretty;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Renders `value` as compact JSON, or through `human` for pretty output.
pub fn render<T, F>(value: &T, format: OutputFormat, human: F) -> String
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => serde_json::to_string(value).unwrap_or_default(),
        OutputFormat::Pretty => human(value),
    }
}
