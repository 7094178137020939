//! Post search over an already fetched listing, and the saved searches
//! that remember a set of filters under a name.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::PostError;
use super::types::{BlogPost, PostStatus};

/// Storage key holding the saved searches.
pub const SAVED_SEARCHES_KEY: &str = "savedSearches";

/// Field a search result is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    #[default]
    Created,
    Updated,
    Title,
}

impl std::str::FromStr for SearchSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(SearchSort::Created),
            "updated" => Ok(SearchSort::Updated),
            "title" => Ok(SearchSort::Title),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Filters applied to a post listing. Empty filters match everything.
///
/// Within one list (statuses, categories, tags) any entry may match;
/// across lists every non-empty filter must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Case-insensitive text matched against title, excerpt, category and tags.
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub statuses: Vec<PostStatus>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Inclusive bounds on the post's display date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub sort_by: SearchSort,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl SearchFilters {
    /// Returns true if `post` passes every filter.
    pub fn matches(&self, post: &BlogPost) -> bool {
        self.matches_text(post)
            && (self.statuses.is_empty() || self.statuses.contains(&post.status))
            && (self.categories.is_empty()
                || post
                    .category
                    .as_ref()
                    .is_some_and(|c| self.categories.contains(c)))
            && (self.tags.is_empty()
                || post
                    .tags
                    .as_ref()
                    .is_some_and(|tags| tags.iter().any(|t| self.tags.contains(t))))
            && self.matches_date(post)
    }

    fn matches_text(&self, post: &BlogPost) -> bool {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |text: &str| text.to_lowercase().contains(&needle);
        contains(&post.title)
            || post.excerpt.as_deref().is_some_and(contains)
            || post.category.as_deref().is_some_and(contains)
            || post
                .tags
                .as_ref()
                .is_some_and(|tags| tags.iter().any(|t| contains(t.as_str())))
    }

    fn matches_date(&self, post: &BlogPost) -> bool {
        let date = post.display_date().date_naive();
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    fn compare(&self, a: &BlogPost, b: &BlogPost) -> Ordering {
        let ordering = match self.sort_by {
            SearchSort::Created => a.created_at.cmp(&b.created_at),
            SearchSort::Updated => a.updated_at.cmp(&b.updated_at),
            SearchSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// The matching posts, sorted. Ties keep their listing order.
    pub fn apply(&self, posts: &[BlogPost]) -> Vec<BlogPost> {
        let mut matched: Vec<BlogPost> = posts.iter().filter(|p| self.matches(p)).cloned().collect();
        matched.sort_by(|a, b| self.compare(a, b));
        matched
    }
}

/// A named set of filters kept in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: Uuid,
    pub name: String,
    pub filters: SearchFilters,
}

pub fn validate_search_name(name: &str) -> Result<(), PostError> {
    if name.trim().is_empty() {
        return Err(PostError::EmptySearchName);
    }
    Ok(())
}
