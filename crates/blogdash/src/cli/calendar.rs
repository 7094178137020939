//! Calendar CLI command.

use chrono::{Datelike, NaiveDate};
use clap::Args;

/// Month to show. Defaults to the current one.
#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Year (e.g. 2024).
    #[arg(long)]
    pub year: Option<i32>,
    /// Month number, 1 to 12.
    #[arg(long)]
    pub month: Option<u32>,
}

impl CalendarArgs {
    /// Resolves the requested month, filling gaps from `today`.
    pub fn resolve(&self, today: NaiveDate) -> (i32, u32) {
        (
            self.year.unwrap_or_else(|| today.year()),
            self.month.unwrap_or_else(|| today.month()),
        )
    }
}
