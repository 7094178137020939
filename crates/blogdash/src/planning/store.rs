//! Planned posts persisted as one JSON array in key-value storage.
//!
//! Every mutation reads the whole collection, changes it and writes it
//! back. This is not safe across processes.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use blogdash_core::planning::{
    build_planning_board, filter_by_date_range, validate_planned_patch, validate_planned_post,
    NewPlannedPost, PlannedPost, PlannedPostPatch, PlanningBoard, PLANNED_POSTS_KEY,
};
use blogdash_core::storage::KeyValueStorage;

use super::PlanningError;

/// Planned posts over a [`KeyValueStorage`] backend.
#[derive(Clone)]
pub struct PlannedPostStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl PlannedPostStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Every planned post, in insertion order.
    ///
    /// Unreadable or corrupt data is logged and treated as an empty
    /// collection. Use [`PlannedPostStore::load`] to tell the cases apart.
    pub fn get_planned_posts(&self) -> Vec<PlannedPost> {
        match self.load() {
            Ok(posts) => posts,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read planned posts, using an empty list");
                Vec::new()
            }
        }
    }

    /// Reads the collection, failing on corrupt data. A missing key is empty.
    pub fn load(&self) -> Result<Vec<PlannedPost>, PlanningError> {
        let Some(raw) = self.storage.get_item(PLANNED_POSTS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| PlanningError::Corrupt(e.to_string()))
    }

    fn save(&self, posts: &[PlannedPost]) -> Result<(), PlanningError> {
        let raw = serde_json::to_string(posts).map_err(|e| PlanningError::Encode(e.to_string()))?;
        self.storage.set_item(PLANNED_POSTS_KEY, &raw)?;
        Ok(())
    }

    /// Adds a planned post under a freshly generated id.
    pub fn add_planned_post(&self, post: NewPlannedPost) -> Result<PlannedPost, PlanningError> {
        validate_planned_post(&post)?;

        let mut posts = self.load()?;
        let planned = post.into_planned_post(Uuid::new_v4());
        posts.push(planned.clone());
        self.save(&posts)?;

        tracing::debug!(id = %planned.id, title = %planned.title, "Planned post added");
        Ok(planned)
    }

    /// Merges `patch` into the post with `id`. Returns `None`, without
    /// writing anything, when no such post exists.
    pub fn update_planned_post(
        &self,
        id: Uuid,
        patch: PlannedPostPatch,
    ) -> Result<Option<PlannedPost>, PlanningError> {
        validate_planned_patch(&patch)?;

        let mut posts = self.load()?;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patch.apply(post);
        let updated = post.clone();
        self.save(&posts)?;

        tracing::debug!(id = %id, "Planned post updated");
        Ok(Some(updated))
    }

    /// Removes the post with `id`. Returns `false` when nothing was removed.
    pub fn delete_planned_post(&self, id: Uuid) -> Result<bool, PlanningError> {
        let mut posts = self.load()?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Ok(false);
        }
        self.save(&posts)?;

        tracing::debug!(id = %id, "Planned post deleted");
        Ok(true)
    }

    /// Planned posts grouped by status, high priority first.
    pub fn planning_board(&self) -> PlanningBoard {
        build_planning_board(&self.get_planned_posts())
    }

    /// Planned posts dated within `[start, end]`.
    pub fn planned_posts_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<PlannedPost> {
        filter_by_date_range(&self.get_planned_posts(), start, end)
    }
}
