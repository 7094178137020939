//! Cache key derivation.
//!
//! Keys are derived from the logical query (operation name plus parameters),
//! so identical queries share both a cache entry and an in-flight request.

/// Key for the full post listing.
pub const ALL_POSTS_KEY: &str = "all-posts";

/// Key for the total post count used by pagination.
pub const POSTS_COUNT_KEY: &str = "posts-count";

/// Key for the lightweight post projection.
pub const POSTS_METADATA_KEY: &str = "posts-metadata";

/// Pattern matching every cached pagination page.
pub const POSTS_PAGE_PATTERN: &str = "posts-page-*";

/// Pattern matching every cached single-post lookup.
pub const POST_DETAIL_PATTERN: &str = "post-*";

/// Returns the cache key for the full post listing.
pub fn all_posts_key() -> String {
    ALL_POSTS_KEY.to_string()
}

/// Returns the cache key for a single post looked up by slug.
pub fn post_key(slug: &str) -> String {
    format!("post-{}", slug)
}

/// Returns the cache key for one page of posts.
pub fn posts_page_key(page: u32, limit: u32) -> String {
    format!("posts-page-{}-{}", page, limit)
}

/// Returns the cache key for the total post count.
pub fn posts_count_key() -> String {
    POSTS_COUNT_KEY.to_string()
}

/// Returns the cache key for the post metadata projection.
pub fn posts_metadata_key() -> String {
    POSTS_METADATA_KEY.to_string()
}

/// Returns the keys and patterns to drop after a successful post mutation.
///
/// Every listing-shaped entry is affected by any write. Single-post entries
/// are dropped for the given slug, or all of them when the slug is unknown
/// (a delete only carries the document id).
pub fn post_write_invalidation_patterns(slug: Option<&str>) -> Vec<String> {
    let mut patterns = vec![
        all_posts_key(),
        posts_count_key(),
        posts_metadata_key(),
        POSTS_PAGE_PATTERN.to_string(),
    ];
    match slug {
        Some(slug) => patterns.push(post_key(slug)),
        None => patterns.push(POST_DETAIL_PATTERN.to_string()),
    }
    patterns
}
