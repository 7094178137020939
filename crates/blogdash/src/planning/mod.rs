//! Local planning store.

mod error;
mod store;

pub use error::PlanningError;
pub use store::PlannedPostStore;
