//! Pure cache helpers: key derivation, glob matching for invalidation,
//! value serialization and the TTL classes used by the access layer.

mod keys;
mod patterns;
mod serialization;
mod ttl;

pub use keys::{
    all_posts_key, post_key, post_write_invalidation_patterns, posts_count_key,
    posts_metadata_key, posts_page_key, ALL_POSTS_KEY, POSTS_COUNT_KEY, POSTS_METADATA_KEY,
    POSTS_PAGE_PATTERN, POST_DETAIL_PATTERN,
};
pub use patterns::pattern_matches;
pub use serialization::{deserialize_value, serialize_value, Result, SerializationError};
pub use ttl::TtlClass;
