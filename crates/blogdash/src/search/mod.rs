//! Saved post searches.

mod error;
mod store;

pub use error::SearchError;
pub use store::SavedSearchStore;
