//! Pure post operations: validation, pagination math and the document
//! queries behind every read the access layer performs.

use chrono::{DateTime, Utc};

use super::error::PostError;
use super::requests::{NewPost, PostPatch, POST_DOCUMENT_TYPE};
use super::types::{BlogPost, PostStatus};
use crate::query::{Direction, Field, Filter, Query};

/// Largest page size accepted by paginated reads.
pub const MAX_PAGE_SIZE: u32 = 100;

const MAX_TITLE_LEN: usize = 200;

/// Derives a URL slug from a title.
///
/// # Examples
///
/// ```
/// use blogdash_core::posts::generate_slug;
///
/// assert_eq!(generate_slug("Hello, World!"), "hello-world");
/// assert_eq!(generate_slug("  Rust  &  Tokio "), "rust-tokio");
/// ```
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if (c.is_whitespace() || c == '-') && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// A slug is non-empty lowercase ASCII alphanumerics separated by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), PostError> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(PostError::InvalidSlug(slug.to_string()))
    }
}

fn validate_title(title: &str) -> Result<(), PostError> {
    if title.trim().is_empty() {
        return Err(PostError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(PostError::TitleTooLong);
    }
    Ok(())
}

/// Validates a post before creation.
pub fn validate_new_post(post: &NewPost) -> Result<(), PostError> {
    validate_title(&post.title)?;
    let slug = post.effective_slug();
    if post.slug.is_none() && slug.is_empty() {
        return Err(PostError::SlugRequired);
    }
    validate_slug(&slug)
}

/// Validates the fields a patch supplies.
pub fn validate_post_patch(patch: &PostPatch) -> Result<(), PostError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(slug) = &patch.slug {
        validate_slug(&slug.current)?;
    }
    Ok(())
}

/// Validates 1-based pagination parameters.
pub fn validate_page(page: u32, limit: u32) -> Result<(), PostError> {
    if page == 0 {
        return Err(PostError::InvalidPage);
    }
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(PostError::InvalidLimit);
    }
    Ok(())
}

/// Number of posts preceding a 1-based page.
pub fn page_offset(page: u32, limit: u32) -> usize {
    page.saturating_sub(1) as usize * limit as usize
}

/// Whether posts remain after the page starting at `offset`.
pub fn has_more(offset: usize, limit: u32, total: usize) -> bool {
    offset + (limit as usize) < total
}

/// Fields returned by listings: everything except the body.
pub fn post_list_projection() -> Vec<Field> {
    let mut fields: Vec<Field> = [
        "_id",
        "_type",
        "_createdAt",
        "_updatedAt",
        "title",
        "slug",
        "excerpt",
        "publishedAt",
        "scheduledDate",
        "status",
        "tags",
        "category",
        "author",
    ]
    .into_iter()
    .map(Field::plain)
    .collect();
    fields.push(Field::object(
        "featuredImage",
        vec![
            Field::deref("asset", vec![Field::plain("_id"), Field::plain("url")]),
            Field::plain("alt"),
        ],
    ));
    fields.push(Field::plain("seo"));
    fields
}

/// Fields returned by single-post lookups: the listing fields plus the body.
pub fn post_detail_projection() -> Vec<Field> {
    let mut fields = post_list_projection();
    fields.insert(7, Field::plain("content"));
    fields
}

fn posts() -> Query {
    Query::documents(POST_DOCUMENT_TYPE)
}

fn newest_first(query: Query) -> Query {
    query
        .order_by("publishedAt", Direction::Desc)
        .order_by("_createdAt", Direction::Desc)
}

/// Every post, newest first.
pub fn all_posts_query() -> Query {
    newest_first(posts()).project(post_list_projection())
}

/// The post with the given slug, including its body.
pub fn post_by_slug_query(slug: &str) -> Query {
    posts()
        .filter(Filter::eq("slug.current", slug))
        .first()
        .project(post_detail_projection())
}

/// One page of posts, newest first.
pub fn posts_page_query(page: u32, limit: u32) -> Query {
    newest_first(posts())
        .slice(page_offset(page, limit), limit as usize)
        .project(post_list_projection())
}

/// Total number of posts.
pub fn posts_count_query() -> Query {
    posts().count()
}

/// Lightweight projection of every post, newest first.
pub fn posts_metadata_query() -> Query {
    newest_first(posts()).project(
        ["_id", "title", "slug", "publishedAt", "status", "tags"]
            .into_iter()
            .map(Field::plain)
            .collect(),
    )
}

/// Posts published within `[start, end]`, oldest first.
pub fn posts_by_date_range_query(start: DateTime<Utc>, end: DateTime<Utc>) -> Query {
    posts()
        .filter(Filter::gte("publishedAt", start))
        .filter(Filter::lte("publishedAt", end))
        .order_by("publishedAt", Direction::Asc)
        .project(post_list_projection())
}

/// Draft posts, most recently edited first.
pub fn draft_posts_query() -> Query {
    posts()
        .filter(Filter::eq("status", "draft"))
        .order_by("_updatedAt", Direction::Desc)
        .project(post_list_projection())
}

/// Scheduled posts, earliest slot first.
pub fn scheduled_posts_query() -> Query {
    posts()
        .filter(Filter::eq("status", PostStatus::Scheduled.as_str()))
        .order_by("scheduledDate", Direction::Asc)
        .project(post_list_projection())
}

/// Scheduled posts whose slot is at or before `now`.
pub fn due_for_publishing(posts: &[BlogPost], now: DateTime<Utc>) -> Vec<&BlogPost> {
    posts
        .iter()
        .filter(|p| p.status == PostStatus::Scheduled && p.scheduled_date.is_some_and(|d| d <= now))
        .collect()
}

/// Appends `added` to `existing`, trimming and skipping blanks and duplicates.
pub fn merge_tags(existing: Option<&[String]>, added: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = existing.map(<[String]>::to_vec).unwrap_or_default();
    for tag in added.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
