//! CMS access layer.
//!
//! Reads go through the shared [`QueryCache`] keyed by the logical query;
//! writes go straight to the store and then drop every cache entry they
//! could have made stale. In demo mode the same queries are evaluated over
//! the built-in dataset and nothing is cached.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use blogdash_core::cache::{
    all_posts_key, post_key, post_write_invalidation_patterns, posts_count_key,
    posts_metadata_key, posts_page_key, TtlClass,
};
use blogdash_core::posts::{
    all_posts_query, demo_posts, draft_posts_query, has_more, page_offset, post_by_slug_query,
    posts_by_date_range_query, posts_count_query, posts_metadata_query, posts_page_query,
    validate_new_post, validate_page, validate_post_patch, BlogPost, NewPost, PaginatedPosts,
    PostError, PostMetadata, PostPatch, SearchFilters,
};
use blogdash_core::query::{evaluate, Query};
use blogdash_core::storage::{DocumentStore, StoreError};

use crate::cache::QueryCache;
use crate::config::Config;
use crate::storage::SanityClient;

use super::CmsError;

enum Backend {
    Remote(Arc<dyn DocumentStore>),
    Demo,
}

/// Post reads and writes against the configured backend.
pub struct CmsService {
    backend: Backend,
    cache: Arc<QueryCache>,
}

impl CmsService {
    /// Creates a service backed by a document store.
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<QueryCache>) -> Self {
        Self {
            backend: Backend::Remote(store),
            cache,
        }
    }

    /// Creates a service that serves the built-in dataset.
    pub fn demo(cache: Arc<QueryCache>) -> Self {
        Self {
            backend: Backend::Demo,
            cache,
        }
    }

    /// Picks the backend from configuration.
    pub fn from_config(config: &Config, cache: Arc<QueryCache>) -> Result<Self, StoreError> {
        match config.sanity() {
            Some(sanity) => {
                let client = SanityClient::new(&sanity)?;
                tracing::info!(
                    project_id = %sanity.project_id,
                    dataset = %sanity.dataset,
                    "Using Sanity backend"
                );
                Ok(Self::new(Arc::new(client), cache))
            }
            None => {
                tracing::info!("No Sanity project configured, serving demo content");
                Ok(Self::demo(cache))
            }
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self.backend, Backend::Demo)
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Every post, newest first.
    pub async fn fetch_all_posts(&self) -> Result<Vec<BlogPost>, CmsError> {
        self.cached_read(&all_posts_key(), TtlClass::Posts, all_posts_query())
            .await
    }

    /// The post with the given slug, including its body.
    pub async fn fetch_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, CmsError> {
        self.cached_read(&post_key(slug), TtlClass::PostDetail, post_by_slug_query(slug))
            .await
    }

    /// One 1-based page of posts plus the total count, fetched concurrently.
    pub async fn fetch_posts_paginated(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedPosts, CmsError> {
        validate_page(page, limit)?;

        let page_key = posts_page_key(page, limit);
        let count_key = posts_count_key();
        let (posts, total) = tokio::try_join!(
            self.cached_read::<Vec<BlogPost>>(
                &page_key,
                TtlClass::Posts,
                posts_page_query(page, limit),
            ),
            self.cached_read::<usize>(
                &count_key,
                TtlClass::Metadata,
                posts_count_query(),
            ),
        )?;

        Ok(PaginatedPosts {
            posts,
            total,
            has_more: has_more(page_offset(page, limit), limit, total),
            page,
            limit,
        })
    }

    pub async fn fetch_posts_metadata(&self) -> Result<Vec<PostMetadata>, CmsError> {
        self.cached_read(
            &posts_metadata_key(),
            TtlClass::Metadata,
            posts_metadata_query(),
        )
        .await
    }

    /// Posts published within `[start, end]`, oldest first. Not cached.
    pub async fn fetch_posts_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BlogPost>, CmsError> {
        if start > end {
            return Err(PostError::InvalidDateRange.into());
        }
        self.uncached_read(posts_by_date_range_query(start, end))
            .await
    }

    /// Drafts, most recently edited first. Not cached.
    pub async fn fetch_draft_posts(&self) -> Result<Vec<BlogPost>, CmsError> {
        self.uncached_read(draft_posts_query()).await
    }

    /// Posts from the cached listing that pass `filters`, in the order
    /// the filters ask for.
    pub async fn search_posts(&self, filters: &SearchFilters) -> Result<Vec<BlogPost>, CmsError> {
        let posts = self.fetch_all_posts().await?;
        Ok(filters.apply(&posts))
    }

    /// Creates a post and returns the stored record.
    pub async fn create_post(&self, post: NewPost) -> Result<BlogPost, CmsError> {
        let store = self.remote()?;
        validate_new_post(&post)?;

        let document = post.into_document(Utc::now()).map_err(encode_error)?;
        let created = store
            .create(document)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "Failed to create post"))?;
        let post: BlogPost = decode(created)?;

        self.invalidate_after_write(Some(&post.slug.current));
        tracing::debug!(post_id = %post.id, slug = %post.slug.current, "Post created");
        Ok(post)
    }

    /// Applies a partial update. Returns `None` when the post does not exist.
    pub async fn update_post(
        &self,
        id: &str,
        patch: PostPatch,
    ) -> Result<Option<BlogPost>, CmsError> {
        let store = self.remote()?;
        validate_post_patch(&patch)?;

        let renames = patch.slug.is_some();
        let set = patch.into_set(Utc::now()).map_err(encode_error)?;
        let updated = match store.patch(id, set).await {
            Ok(document) => document,
            Err(err) if err.is_not_found() => {
                tracing::debug!(post_id = %id, "Post to update not found");
                return Ok(None);
            }
            Err(err) => {
                tracing::error!(post_id = %id, error = %err, "Failed to update post");
                return Err(err.into());
            }
        };
        let post: BlogPost = decode(updated)?;

        // The old slug is unknown after a rename.
        let slug = (!renames).then_some(post.slug.current.as_str());
        self.invalidate_after_write(slug);
        tracing::debug!(post_id = %post.id, "Post updated");
        Ok(Some(post))
    }

    /// Deletes a post. Returns `false` when it did not exist.
    pub async fn delete_post(&self, id: &str) -> Result<bool, CmsError> {
        let store = self.remote()?;

        match store.delete(id).await {
            Ok(()) => {
                self.invalidate_after_write(None);
                tracing::debug!(post_id = %id, "Post deleted");
                Ok(true)
            }
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => {
                tracing::error!(post_id = %id, error = %err, "Failed to delete post");
                Err(err.into())
            }
        }
    }

    pub(super) fn remote(&self) -> Result<&Arc<dyn DocumentStore>, CmsError> {
        match &self.backend {
            Backend::Remote(store) => Ok(store),
            Backend::Demo => Err(CmsError::DemoMode),
        }
    }

    async fn cached_read<V>(&self, key: &str, ttl: TtlClass, query: Query) -> Result<V, CmsError>
    where
        V: Serialize + DeserializeOwned + Send + 'static,
    {
        let result = match &self.backend {
            Backend::Demo => demo_read(&query),
            Backend::Remote(store) => {
                let store = Arc::clone(store);
                self.cache
                    .cached_query(key, ttl.duration(), move || remote_read(store, query))
                    .await
            }
        };
        result.map_err(|err| {
            tracing::error!(key = %key, error = %err, "CMS query failed");
            err.into()
        })
    }

    pub(super) async fn uncached_read<V>(&self, query: Query) -> Result<V, CmsError>
    where
        V: DeserializeOwned + Send + 'static,
    {
        let result = match &self.backend {
            Backend::Demo => demo_read(&query),
            Backend::Remote(store) => remote_read(Arc::clone(store), query).await,
        };
        result.map_err(|err| {
            tracing::error!(error = %err, "CMS query failed");
            err.into()
        })
    }

    fn invalidate_after_write(&self, slug: Option<&str>) {
        let patterns = post_write_invalidation_patterns(slug);
        let dropped = self.cache.invalidate(&patterns);
        tracing::trace!(dropped, "Invalidated cached post queries");
    }
}

async fn remote_read<V: DeserializeOwned>(
    store: Arc<dyn DocumentStore>,
    query: Query,
) -> Result<V, StoreError> {
    let value = store.fetch(&query).await?;
    decode(value)
}

fn demo_read<V: DeserializeOwned>(query: &Query) -> Result<V, StoreError> {
    let documents: Vec<Value> = demo_posts().iter().map(BlogPost::to_document).collect();
    decode(evaluate(query, &documents, |_| None))
}

fn decode<V: DeserializeOwned>(value: Value) -> Result<V, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn encode_error(err: serde_json::Error) -> StoreError {
    StoreError::Serialization(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::Map;

    use blogdash_core::posts::{generate_seed_posts, PostStatus, Slug};
    use blogdash_core::storage::Result as StoreResult;

    use crate::storage::InMemoryDocumentStore;

    /// In-memory store that counts fetches and can be switched to failing.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryDocumentStore,
        fetches: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
    }

    impl CountingStore {
        fn with_posts(posts: &[BlogPost]) -> Self {
            Self {
                inner: InMemoryDocumentStore::with_posts(posts),
                ..Default::default()
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn fetch(&self, query: &Query) -> StoreResult<Value> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::ConnectionFailed("offline".to_string()));
            }
            self.inner.fetch(query).await
        }

        async fn create(&self, document: Value) -> StoreResult<Value> {
            self.inner.create(document).await
        }

        async fn patch(&self, id: &str, set: Map<String, Value>) -> StoreResult<Value> {
            self.inner.patch(id, set).await
        }

        async fn delete(&self, id: &str) -> StoreResult<()> {
            self.inner.delete(id).await
        }
    }

    fn newest() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn service(store: Arc<CountingStore>) -> CmsService {
        CmsService::new(store, Arc::new(QueryCache::new()))
    }

    #[tokio::test]
    async fn test_pagination_over_25_posts() {
        let store = Arc::new(CountingStore::with_posts(&generate_seed_posts(25, newest())));
        let cms = service(store);

        let first = cms.fetch_posts_paginated(1, 10).await.unwrap();
        assert_eq!(first.posts.len(), 10);
        assert_eq!(first.total, 25);
        assert!(first.has_more);
        assert_eq!(first.page, 1);

        let last = cms.fetch_posts_paginated(3, 10).await.unwrap();
        assert_eq!(last.posts.len(), 5);
        assert_eq!(last.total, 25);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn test_pagination_rejects_bad_page() {
        let cms = service(Arc::new(CountingStore::default()));

        assert_eq!(
            cms.fetch_posts_paginated(0, 10).await.unwrap_err(),
            CmsError::Invalid(PostError::InvalidPage)
        );
        assert_eq!(
            cms.fetch_posts_paginated(1, 500).await.unwrap_err(),
            CmsError::Invalid(PostError::InvalidLimit)
        );
    }

    #[tokio::test]
    async fn test_pages_are_cached() {
        let store = Arc::new(CountingStore::with_posts(&generate_seed_posts(25, newest())));
        let cms = service(store.clone());

        cms.fetch_posts_paginated(2, 10).await.unwrap();
        cms.fetch_posts_paginated(2, 10).await.unwrap();

        // One page query plus one count query.
        assert_eq!(store.fetches(), 2);
        assert!(cms.cache().contains("posts-page-2-10"));
        assert!(cms.cache().contains("posts-count"));
    }

    #[tokio::test]
    async fn test_fetch_all_posts_is_cached() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        let cms = service(store.clone());

        let first = cms.fetch_all_posts().await.unwrap();
        let second = cms.fetch_all_posts().await.unwrap();

        assert_eq!(first.len(), 6);
        assert_eq!(first, second);
        assert_eq!(store.fetches(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_fetch() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        let cms = service(store.clone());

        let (a, b) = tokio::join!(cms.fetch_all_posts(), cms.fetch_all_posts());

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(store.fetches(), 1);
    }

    #[tokio::test]
    async fn test_fetch_post_by_slug() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        let cms = service(store.clone());

        let post = cms
            .fetch_post_by_slug("getting-started-with-headless-cms")
            .await
            .unwrap();
        let missing = cms.fetch_post_by_slug("no-such-post").await.unwrap();
        let missing_again = cms.fetch_post_by_slug("no-such-post").await.unwrap();

        let post = post.expect("demo post should exist");
        assert_eq!(post.id, "demo-1");
        assert!(post.content.is_some());
        assert!(missing.is_none());
        assert!(missing_again.is_none());
        // Absence is cached too.
        assert_eq!(store.fetches(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_cached() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        store.fail.store(true, Ordering::SeqCst);
        let cms = service(store.clone());

        let result = cms.fetch_all_posts().await;
        assert_eq!(
            result.unwrap_err(),
            CmsError::Store(StoreError::ConnectionFailed("offline".to_string()))
        );
        assert!(!cms.cache().contains("all-posts"));

        store.fail.store(false, Ordering::SeqCst);
        assert_eq!(cms.fetch_all_posts().await.unwrap().len(), 6);
        assert_eq!(store.fetches(), 2);
    }

    #[tokio::test]
    async fn test_metadata() {
        let cms = service(Arc::new(CountingStore::with_posts(&demo_posts())));

        let metadata = cms.fetch_posts_metadata().await.unwrap();

        assert_eq!(metadata.len(), 6);
        assert_eq!(metadata[0].id, "demo-1");
        assert!(cms.cache().contains("posts-metadata"));
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive_and_uncached() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        let cms = service(store.clone());
        let start = Utc.with_ymd_and_hms(2024, 2, 12, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 18, 23, 59, 59).unwrap();

        let posts = cms.fetch_posts_by_date_range(start, end).await.unwrap();
        cms.fetch_posts_by_date_range(start, end).await.unwrap();

        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["demo-3", "demo-2", "demo-1"]);
        assert_eq!(store.fetches(), 2);
        assert_eq!(cms.cache().size(), 0);
    }

    #[tokio::test]
    async fn test_date_range_rejects_reversed_bounds() {
        let cms = service(Arc::new(CountingStore::default()));
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        assert_eq!(
            cms.fetch_posts_by_date_range(start, end).await.unwrap_err(),
            CmsError::Invalid(PostError::InvalidDateRange)
        );
    }

    #[tokio::test]
    async fn test_draft_posts() {
        let cms = service(Arc::new(CountingStore::with_posts(&demo_posts())));

        let drafts = cms.fetch_draft_posts().await.unwrap();

        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|p| p.status == PostStatus::Draft));
    }

    #[tokio::test]
    async fn test_create_post_invalidates_listings() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        let cms = service(store.clone());
        assert_eq!(cms.fetch_all_posts().await.unwrap().len(), 6);

        let created = cms
            .create_post(NewPost::new("Fresh Thoughts").with_tags(vec!["rust".to_string()]))
            .await
            .unwrap();

        assert_eq!(created.title, "Fresh Thoughts");
        assert_eq!(created.slug.current, "fresh-thoughts");
        assert_eq!(created.status, PostStatus::Draft);
        assert!(!cms.cache().contains("all-posts"));
        assert_eq!(cms.fetch_all_posts().await.unwrap().len(), 7);
        assert_eq!(store.fetches(), 2);
    }

    #[tokio::test]
    async fn test_created_published_post_is_dated_now() {
        let cms = service(Arc::new(CountingStore::with_posts(&demo_posts())));
        let before = Utc::now();

        let created = cms
            .create_post(NewPost::new("Launch Day").with_status(PostStatus::Published))
            .await
            .unwrap();

        let published_at = created.published_at.expect("published post has a publish time");
        assert!(published_at >= before && published_at <= Utc::now());
        let in_range = cms
            .fetch_posts_by_date_range(before, Utc::now())
            .await
            .unwrap();
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].id, created.id);
        assert_eq!(cms.fetch_all_posts().await.unwrap()[0].id, created.id);
    }

    #[tokio::test]
    async fn test_search_posts_uses_cached_listing() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        let cms = service(store.clone());
        let filters = SearchFilters {
            query: "workflow".to_string(),
            statuses: vec![PostStatus::Published],
            ..Default::default()
        };

        let found = cms.search_posts(&filters).await.unwrap();
        cms.search_posts(&SearchFilters::default()).await.unwrap();

        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["demo-2"]);
        assert_eq!(store.fetches(), 1);
    }

    #[tokio::test]
    async fn test_create_post_validates() {
        let store = Arc::new(CountingStore::default());
        let cms = service(store.clone());

        let result = cms.create_post(NewPost::new("   ")).await;

        assert_eq!(result.unwrap_err(), CmsError::Invalid(PostError::EmptyTitle));

        let result = cms.create_post(NewPost::new("日本語")).await;
        assert_eq!(result.unwrap_err(), CmsError::Invalid(PostError::SlugRequired));
        assert!(cms
            .create_post(NewPost::new("日本語").with_slug("nihongo"))
            .await
            .is_ok());
        assert_eq!(store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_post_requeries_store() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        let cms = service(store.clone());
        cms.fetch_all_posts().await.unwrap();
        assert_eq!(store.fetches(), 1);

        let patch = PostPatch {
            title: Some("Getting Started, Revised".to_string()),
            ..Default::default()
        };
        let updated = cms.update_post("demo-1", patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "Getting Started, Revised");
        assert!(updated.updated_at > updated.created_at);

        let posts = cms.fetch_all_posts().await.unwrap();
        assert_eq!(store.fetches(), 2);
        assert_eq!(posts[0].title, "Getting Started, Revised");
    }

    #[tokio::test]
    async fn test_update_drops_cached_slug() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        let cms = service(store.clone());
        let slug = "getting-started-with-headless-cms";
        cms.fetch_post_by_slug(slug).await.unwrap();
        assert!(cms.cache().contains(&post_key(slug)));

        let patch = PostPatch {
            slug: Some(Slug::new("headless-basics")),
            ..Default::default()
        };
        cms.update_post("demo-1", patch).await.unwrap();

        assert!(!cms.cache().contains(&post_key(slug)));
        assert!(cms.fetch_post_by_slug(slug).await.unwrap().is_none());
        assert!(cms
            .fetch_post_by_slug("headless-basics")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_update_missing_post_returns_none() {
        let cms = service(Arc::new(CountingStore::with_posts(&demo_posts())));

        let patch = PostPatch {
            title: Some("Nope".to_string()),
            ..Default::default()
        };

        assert_eq!(cms.update_post("missing", patch).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_post() {
        let store = Arc::new(CountingStore::with_posts(&demo_posts()));
        let cms = service(store.clone());
        cms.fetch_posts_metadata().await.unwrap();

        assert!(cms.delete_post("demo-2").await.unwrap());
        assert!(!cms.delete_post("demo-2").await.unwrap());
        assert!(!cms.cache().contains("posts-metadata"));
        assert_eq!(cms.fetch_posts_metadata().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_demo_mode_reads_builtin_dataset_without_caching() {
        let cms = CmsService::demo(Arc::new(QueryCache::new()));

        let posts = cms.fetch_all_posts().await.unwrap();

        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["demo-1", "demo-2", "demo-3", "demo-4", "demo-5", "demo-6"]
        );
        assert!(!cms.cache().contains("all-posts"));
        assert_eq!(cms.cache().size(), 0);
    }

    #[tokio::test]
    async fn test_demo_mode_serves_every_read() {
        let cms = CmsService::demo(Arc::new(QueryCache::new()));

        let page = cms.fetch_posts_paginated(1, 4).await.unwrap();
        assert_eq!(page.posts.len(), 4);
        assert_eq!(page.total, 6);
        assert!(page.has_more);

        assert!(cms
            .fetch_post_by_slug("getting-started-with-headless-cms")
            .await
            .unwrap()
            .is_some());
        assert_eq!(cms.fetch_draft_posts().await.unwrap().len(), 2);
        assert_eq!(cms.cache().size(), 0);
    }

    #[tokio::test]
    async fn test_demo_mode_refuses_mutations() {
        let cms = CmsService::demo(Arc::new(QueryCache::new()));

        assert_eq!(
            cms.create_post(NewPost::new("Title")).await.unwrap_err(),
            CmsError::DemoMode
        );
        assert_eq!(
            cms.update_post("demo-1", PostPatch::default())
                .await
                .unwrap_err(),
            CmsError::DemoMode
        );
        assert_eq!(cms.delete_post("demo-1").await.unwrap_err(), CmsError::DemoMode);
    }

    #[test]
    fn test_from_config_picks_backend() {
        let demo = Config::from_lookup(|_| None);
        assert!(CmsService::from_config(&demo, Arc::new(QueryCache::new()))
            .unwrap()
            .is_demo());

        let remote = Config::from_lookup(|name| {
            (name == "SANITY_PROJECT_ID").then(|| "abc123".to_string())
        });
        assert!(!CmsService::from_config(&remote, Arc::new(QueryCache::new()))
            .unwrap()
            .is_demo());
    }
}
