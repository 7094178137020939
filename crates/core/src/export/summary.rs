use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::planning::{PlannedPost, PlannedStatus};
use crate::posts::{BlogPost, PostStatus};

/// How many tags the summary lists.
const TOP_TAGS: usize = 5;

/// Aggregate figures over posts and planned posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub total_posts: usize,
    pub published: usize,
    pub drafts: usize,
    pub scheduled: usize,
    pub planned_posts: usize,
    pub plans_in_progress: usize,
    pub plans_completed: usize,
    /// Posts per category. Posts without one are counted as "Uncategorized".
    pub by_category: BTreeMap<String, usize>,
    /// Most used tags, most frequent first, ties broken alphabetically.
    pub top_tags: Vec<TagCount>,
    /// Mean of the planned posts' estimated read time, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_read_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

pub fn summarize_content(posts: &[BlogPost], planned: &[PlannedPost]) -> ContentSummary {
    let count_status = |status: PostStatus| posts.iter().filter(|p| p.status == status).count();
    let count_plans = |status: PlannedStatus| planned.iter().filter(|p| p.status == status).count();

    let mut by_category = BTreeMap::new();
    for post in posts {
        let category = post
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "Uncategorized".to_string());
        *by_category.entry(category).or_insert(0) += 1;
    }

    let mut tag_counts: HashMap<&str, usize> = HashMap::new();
    for tag in posts.iter().flat_map(|p| p.tags.iter().flatten()) {
        *tag_counts.entry(tag.as_str()).or_insert(0) += 1;
    }
    let mut top_tags: Vec<TagCount> = tag_counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    top_tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    top_tags.truncate(TOP_TAGS);

    let estimates: Vec<u32> = planned.iter().filter_map(|p| p.estimated_read_time).collect();
    let average_read_time = if estimates.is_empty() {
        None
    } else {
        Some(estimates.iter().map(|&m| m as f64).sum::<f64>() / estimates.len() as f64)
    };

    ContentSummary {
        total_posts: posts.len(),
        published: count_status(PostStatus::Published),
        drafts: count_status(PostStatus::Draft),
        scheduled: count_status(PostStatus::Scheduled),
        planned_posts: planned.len(),
        plans_in_progress: count_plans(PlannedStatus::InProgress),
        plans_completed: count_plans(PlannedStatus::Completed),
        by_category,
        top_tags,
        average_read_time,
        latest_published_at: posts.iter().filter_map(|p| p.published_at).max(),
    }
}
