//! Query result caching for the CMS access layer.
//!
//! - [`TtlCache`]: key-value store with per-entry expiration
//! - [`RequestDeduplicator`]: one in-flight request per key
//! - [`QueryCache`]: both composed around an async fetch

mod dedup;
mod executor;
mod ttl_cache;

pub use dedup::RequestDeduplicator;
pub use executor::QueryCache;
pub use ttl_cache::TtlCache;
