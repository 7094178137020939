//! blogdash_core - functional core of the blogdash content dashboard.
//!
//! Everything in this crate is pure: domain types, cache key derivation,
//! the document query model, and the operations over posts, planned posts
//! and calendar events. I/O lives in the `blogdash` crate behind the
//! traits declared in [`storage`].

pub mod cache;
pub mod calendar;
pub mod export;
pub mod planning;
pub mod posts;
pub mod query;
pub mod serde;
pub mod storage;
