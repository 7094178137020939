use std::time::Duration;

/// Freshness classes for cached CMS queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Post listings and pages: 5 minutes.
    Posts,
    /// A single post with full content: 10 minutes.
    PostDetail,
    /// Counts and lightweight projections: 15 minutes.
    Metadata,
}

impl TtlClass {
    /// Returns the time-to-live in minutes.
    pub fn minutes(self) -> u64 {
        match self {
            TtlClass::Posts => 5,
            TtlClass::PostDetail => 10,
            TtlClass::Metadata => 15,
        }
    }

    /// Returns the time-to-live as a Duration.
    pub fn duration(self) -> Duration {
        Duration::from_secs(self.minutes() * 60)
    }
}
