mod error;
mod mock_data;
mod operations;
mod requests;
mod search;
mod types;

pub use error::PostError;
pub use mock_data::{demo_posts, generate_seed_posts};
pub use operations::{
    all_posts_query, draft_posts_query, due_for_publishing, generate_slug, has_more, merge_tags,
    page_offset, post_by_slug_query, post_detail_projection, post_list_projection,
    posts_by_date_range_query, posts_count_query, posts_metadata_query, posts_page_query,
    scheduled_posts_query, validate_new_post, validate_page, validate_post_patch, validate_slug,
    MAX_PAGE_SIZE,
};
pub use requests::{NewPost, PostPatch, POST_DOCUMENT_TYPE};
pub use search::{
    validate_search_name, SavedSearch, SearchFilters, SearchSort, SortOrder, SAVED_SEARCHES_KEY,
};
pub use types::{
    Author, BlogPost, FeaturedImage, ImageAsset, PaginatedPosts, PostMetadata, PostStatus, Seo,
    Slug,
};
