//! Planned posts: records the operator plans locally before anything
//! exists in the CMS.

mod error;
mod operations;
mod types;

pub use error::PlannedPostError;
pub use operations::{
    build_planning_board, filter_by_date_range, sort_by_priority, validate_planned_patch,
    validate_planned_post, PlanningBoard,
};
pub use types::{NewPlannedPost, PlannedPost, PlannedPostPatch, PlannedStatus, Priority};

/// Storage key holding the serialized collection.
pub const PLANNED_POSTS_KEY: &str = "plannedPosts";
