//! Operations applied to many posts at once, including publishing the
//! scheduled posts whose slot has passed.
//!
//! Every post is written concurrently through the single-post operations,
//! so each write invalidates the cache on its own. One failing post does
//! not stop the others; the outcome reports each id.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;

use blogdash_core::posts::{
    due_for_publishing, merge_tags, scheduled_posts_query, BlogPost, PostError, PostPatch,
    PostStatus,
};

use super::{CmsError, CmsService};

/// Per-post result of a bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub succeeded: Vec<String>,
    /// Ids that matched no post.
    pub missing: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub id: String,
    pub error: String,
}

impl BulkOutcome {
    fn collect<'a>(
        ids: impl IntoIterator<Item = &'a String>,
        results: Vec<Result<bool, CmsError>>,
    ) -> Self {
        let mut outcome = Self::default();
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(true) => outcome.succeeded.push(id.clone()),
                Ok(false) => outcome.missing.push(id.clone()),
                Err(err) => outcome.failed.push(BulkFailure {
                    id: id.clone(),
                    error: err.to_string(),
                }),
            }
        }
        outcome
    }

    /// True when every id was applied.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }
}

impl CmsService {
    /// Deletes every post in `ids`.
    pub async fn bulk_delete(&self, ids: &[String]) -> Result<BulkOutcome, CmsError> {
        self.remote()?;
        let results = join_all(ids.iter().map(|id| self.delete_post(id))).await;

        let outcome = BulkOutcome::collect(ids, results);
        tracing::info!(
            deleted = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Bulk delete finished"
        );
        Ok(outcome)
    }

    /// Moves every post in `ids` to `status`. Publishing stamps the publish time.
    pub async fn bulk_set_status(
        &self,
        ids: &[String],
        status: PostStatus,
    ) -> Result<BulkOutcome, CmsError> {
        self.remote()?;
        Ok(self
            .patch_all(ids, PostPatch::status_change(status, Utc::now()))
            .await)
    }

    /// Adds `tags` to every post in `ids`, keeping the tags each post has.
    pub async fn bulk_add_tags(
        &self,
        ids: &[String],
        tags: &[String],
    ) -> Result<BulkOutcome, CmsError> {
        self.remote()?;
        if merge_tags(None, tags).is_empty() {
            return Err(PostError::NoTags.into());
        }

        let posts = self.fetch_all_posts().await?;
        let posts = &posts;
        let results = join_all(ids.iter().map(|id| async move {
            let Some(post) = posts.iter().find(|p| &p.id == id) else {
                return Ok(false);
            };
            let patch = PostPatch {
                tags: Some(merge_tags(post.tags.as_deref(), tags)),
                ..Default::default()
            };
            self.update_post(id, patch).await.map(|p| p.is_some())
        }))
        .await;

        Ok(BulkOutcome::collect(ids, results))
    }

    /// Scheduled posts whose slot is at or before `now`. Not cached.
    pub async fn fetch_due_posts(&self, now: DateTime<Utc>) -> Result<Vec<BlogPost>, CmsError> {
        let scheduled: Vec<BlogPost> = self.uncached_read(scheduled_posts_query()).await?;
        Ok(due_for_publishing(&scheduled, now)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Publishes every due scheduled post with `now` as its publish time.
    pub async fn publish_due_posts(&self, now: DateTime<Utc>) -> Result<BulkOutcome, CmsError> {
        self.remote()?;
        let ids: Vec<String> = self
            .fetch_due_posts(now)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        if ids.is_empty() {
            tracing::debug!("No scheduled posts are due");
            return Ok(BulkOutcome::default());
        }

        let outcome = self
            .patch_all(&ids, PostPatch::status_change(PostStatus::Published, now))
            .await;
        tracing::info!(
            published = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Published scheduled posts"
        );
        Ok(outcome)
    }

    async fn patch_all(&self, ids: &[String], patch: PostPatch) -> BulkOutcome {
        let results = join_all(ids.iter().map(|id| {
            let patch = patch.clone();
            async move { self.update_post(id, patch).await.map(|p| p.is_some()) }
        }))
        .await;
        BulkOutcome::collect(ids, results)
    }
}
