//! blogdash - data access, caching and local planning for a headless-CMS
//! blog dashboard.
//!
//! The pure domain lives in `blogdash_core`; this crate owns the I/O:
//! the query cache, the CMS access layer and its storage backends, the
//! planning store and the CLI.

pub mod cache;
pub mod calendar;
pub mod cli;
pub mod cms;
pub mod config;
pub mod output;
pub mod planning;
pub mod search;
pub mod storage;

pub use cache::QueryCache;
pub use cms::{CmsError, CmsService};
pub use config::Config;
pub use planning::{PlannedPostStore, PlanningError};
pub use search::{SavedSearchStore, SearchError};
