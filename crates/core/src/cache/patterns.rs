//! Pure pattern matching functions for cache keys.
//!
//! Patterns are globs where `*` matches any sequence of characters,
//! including the empty one. Every other character matches itself.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use blogdash_core::cache::pattern_matches;
///
/// assert!(pattern_matches("all-posts", "all-posts"));
/// assert!(pattern_matches("posts-page-*", "posts-page-2-10"));
/// assert!(pattern_matches("post-*-draft", "post-hello-draft"));
/// assert!(!pattern_matches("post-*", "posts-count"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let mut segments = pattern.split('*');

    // Text before the first wildcard anchors at the start.
    let head = segments.next().unwrap_or_default();
    let Some(mut remaining) = key.strip_prefix(head) else {
        return false;
    };

    let rest: Vec<&str> = segments.collect();
    let Some((tail, middle)) = rest.split_last() else {
        return true;
    };

    // Middle segments match greedily left to right.
    for segment in middle.iter().filter(|s| !s.is_empty()) {
        match remaining.find(segment) {
            Some(pos) => remaining = &remaining[pos + segment.len()..],
            None => return false,
        }
    }

    // Text after the last wildcard anchors at the end.
    remaining.ends_with(tail)
}
