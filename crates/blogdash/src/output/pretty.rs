//! Pretty output formatting.

use blogdash_core::calendar::CalendarDay;
use blogdash_core::export::ContentSummary;
use blogdash_core::planning::{PlannedPost, PlannedStatus, PlanningBoard};
use blogdash_core::posts::{BlogPost, PaginatedPosts, PostMetadata, SavedSearch};

use crate::calendar::MonthView;
use crate::cms::BulkOutcome;

const RULE_WIDTH: usize = 40;

fn section(title: &str, count: usize) -> String {
    let mut output = format!("{} ({})\n", title, count);
    output.push_str(&"-".repeat(RULE_WIDTH));
    output
}

/// Format a post for display.
pub fn format_post(post: &BlogPost) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Slug: {}\n  Date: {}",
        post.title,
        post.status,
        post.id,
        post.slug.current,
        post.display_date().format("%Y-%m-%d")
    );
    if let Some(category) = &post.category {
        output.push_str(&format!("\n  Category: {}", category));
    }
    if let Some(tags) = post.tags.as_ref().filter(|t| !t.is_empty()) {
        output.push_str(&format!("\n  Tags: {}", tags.join(", ")));
    }
    if let Some(excerpt) = &post.excerpt {
        output.push_str(&format!("\n  Excerpt: {}", excerpt));
    }
    output
}

/// Format posts for display.
pub fn format_posts(posts: &[BlogPost]) -> String {
    if posts.is_empty() {
        return "No posts found.".to_string();
    }
    let mut output = section("POSTS", posts.len());
    for post in posts {
        output.push_str(&format!("\n{}", format_post(post)));
        output.push('\n');
    }
    output
}

/// Format one page of posts with a pager line.
pub fn format_page(page: &PaginatedPosts) -> String {
    let mut output = format_posts(&page.posts);
    output.push_str(&format!(
        "\nPage {} ({} per page), {} posts total",
        page.page, page.limit, page.total
    ));
    if page.has_more {
        output.push_str(", more available");
    }
    output
}

/// Format post metadata as one line per post.
pub fn format_metadata(metadata: &[PostMetadata]) -> String {
    if metadata.is_empty() {
        return "No posts found.".to_string();
    }
    let mut output = section("POSTS", metadata.len());
    for post in metadata {
        let date = post
            .published_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "\n{:<10} {:<10} {} ({})",
            date,
            post.status.as_str(),
            post.title,
            post.slug.current
        ));
    }
    output
}

/// Format a planned post for display.
pub fn format_planned_post(post: &PlannedPost) -> String {
    let mut output = format!(
        "{} [{}, {}]\n  ID: {}\n  Date: {}",
        post.title,
        post.status.label(),
        post.priority,
        post.id,
        post.planned_date
    );
    if let Some(description) = &post.description {
        output.push_str(&format!("\n  Description: {}", description));
    }
    if let Some(tags) = post.tags.as_ref().filter(|t| !t.is_empty()) {
        output.push_str(&format!("\n  Tags: {}", tags.join(", ")));
    }
    if let Some(minutes) = post.estimated_read_time {
        output.push_str(&format!("\n  Read time: {} min", minutes));
    }
    output
}

/// Format planned posts for display.
pub fn format_planned_posts(posts: &[PlannedPost]) -> String {
    if posts.is_empty() {
        return "No planned posts found.".to_string();
    }
    let mut output = section("PLANNED POSTS", posts.len());
    for post in posts {
        output.push_str(&format!("\n{}", format_planned_post(post)));
        output.push('\n');
    }
    output
}

/// Format the result of a bulk operation.
pub fn format_bulk_outcome(outcome: &BulkOutcome) -> String {
    let mut output = format!("{} post(s) updated", outcome.succeeded.len());
    if !outcome.missing.is_empty() {
        output.push_str(&format!("
Not found: {}", outcome.missing.join(", ")));
    }
    for failure in &outcome.failed {
        output.push_str(&format!("
Failed {}: {}", failure.id, failure.error));
    }
    output
}

/// Format saved searches, one per line.
pub fn format_saved_searches(searches: &[SavedSearch]) -> String {
    if searches.is_empty() {
        return "No saved searches.".to_string();
    }
    let mut output = section("SAVED SEARCHES", searches.len());
    for search in searches {
        let filters = &search.filters;
        let mut parts = Vec::new();
        if !filters.query.trim().is_empty() {
            parts.push(format!("\"{}\"", filters.query.trim()));
        }
        if !filters.statuses.is_empty() {
            let statuses: Vec<&str> = filters.statuses.iter().map(|s| s.as_str()).collect();
            parts.push(format!("status: {}", statuses.join(",")));
        }
        if !filters.categories.is_empty() {
            parts.push(format!("category: {}", filters.categories.join(",")));
        }
        if !filters.tags.is_empty() {
            parts.push(format!("tag: {}", filters.tags.join(",")));
        }
        if parts.is_empty() {
            parts.push("all posts".to_string());
        }
        output.push_str(&format!("\n{}: {}", search.name, parts.join(", ")));
    }
    output
}

/// Format the planning board, one section per status.
pub fn format_board(board: &PlanningBoard) -> String {
    PlannedStatus::ALL
        .iter()
        .map(|status| {
            let column = board.column(*status);
            let mut output = section(&status.label().to_uppercase(), column.len());
            for post in column {
                output.push_str(&format!(
                    "\n  [{}] {} ({})",
                    post.priority, post.title, post.planned_date
                ));
            }
            output
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_day(day: &CalendarDay) -> String {
    let mut output = day.date.format("%a %d").to_string();
    for event in &day.events {
        output.push_str(&format!("\n  {:<9} {}", event.kind.as_str(), event.title));
    }
    output
}

/// Format a month view, listing only days that have events.
pub fn format_month(view: &MonthView) -> String {
    let mut output = format!(
        "{}-{:02}: {} published, {} draft, {} planned\n",
        view.year, view.month, view.counts.published, view.counts.draft, view.counts.planned
    );
    output.push_str(&"-".repeat(RULE_WIDTH));

    let busy: Vec<&CalendarDay> = view
        .days
        .iter()
        .filter(|d| d.in_month && !d.events.is_empty())
        .collect();
    if busy.is_empty() {
        output.push_str("\nNo events this month.");
    }
    for day in busy {
        output.push_str(&format!("\n{}", format_day(day)));
    }
    output
}

/// Format the content summary.
pub fn format_summary(summary: &ContentSummary) -> String {
    let mut output = format!(
        "Posts: {} ({} published, {} drafts, {} scheduled)\nPlanned: {} ({} in progress, {} completed)",
        summary.total_posts,
        summary.published,
        summary.drafts,
        summary.scheduled,
        summary.planned_posts,
        summary.plans_in_progress,
        summary.plans_completed
    );
    if !summary.by_category.is_empty() {
        output.push_str("\nCategories:");
        for (category, count) in &summary.by_category {
            output.push_str(&format!("\n  {}: {}", category, count));
        }
    }
    if !summary.top_tags.is_empty() {
        let tags: Vec<String> = summary
            .top_tags
            .iter()
            .map(|t| format!("{} ({})", t.tag, t.count))
            .collect();
        output.push_str(&format!("\nTop tags: {}", tags.join(", ")));
    }
    if let Some(minutes) = summary.average_read_time {
        output.push_str(&format!("\nAverage read time: {:.1} min", minutes));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogdash_core::export::summarize_content;
    use blogdash_core::planning::{build_planning_board, NewPlannedPost, Priority};
    use blogdash_core::posts::demo_posts;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_format_post() {
        let output = format_post(&demo_posts()[0]);

        assert!(output.starts_with("Getting Started with Headless CMS [published]"));
        assert!(output.contains("\n  ID: demo-1"));
        assert!(output.contains("\n  Date: 2024-03-18"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_posts(&[]), "No posts found.");
        assert_eq!(format_planned_posts(&[]), "No planned posts found.");
    }

    #[test]
    fn test_format_page_mentions_more() {
        let page = PaginatedPosts {
            posts: demo_posts().into_iter().take(2).collect(),
            total: 6,
            has_more: true,
            page: 1,
            limit: 2,
        };

        let output = format_page(&page);

        assert!(output.starts_with("POSTS (2)"));
        assert!(output.ends_with("Page 1 (2 per page), 6 posts total, more available"));
    }

    #[test]
    fn test_format_board() {
        let post = NewPlannedPost::new("Roadmap", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .with_priority(Priority::High)
            .into_planned_post(Uuid::new_v4());

        let output = format_board(&build_planning_board(&[post]));

        assert!(output.contains("[high] Roadmap (2025-01-01)"));
        assert!(output.starts_with("PLANNED (1)"));
        assert!(output.contains("IN PROGRESS (0)"));
    }

    #[test]
    fn test_format_summary() {
        let output = format_summary(&summarize_content(&demo_posts(), &[]));

        assert!(output.starts_with("Posts: 6 (3 published, 2 drafts, 1 scheduled)"));
        assert!(output.contains("Categories:"));
    }

    #[test]
    fn test_format_bulk_outcome() {
        let outcome = BulkOutcome {
            succeeded: vec!["p1".to_string(), "p2".to_string()],
            missing: vec!["p3".to_string()],
            failed: vec![crate::cms::BulkFailure {
                id: "p4".to_string(),
                error: "offline".to_string(),
            }],
        };

        assert_eq!(
            format_bulk_outcome(&outcome),
            "2 post(s) updated\nNot found: p3\nFailed p4: offline"
        );
    }

    #[test]
    fn test_format_saved_searches() {
        let search = SavedSearch {
            id: Uuid::nil(),
            name: "Drafts".to_string(),
            filters: blogdash_core::posts::SearchFilters {
                query: "rust".to_string(),
                statuses: vec![blogdash_core::posts::PostStatus::Draft],
                ..Default::default()
            },
        };

        let output = format_saved_searches(&[search]);

        assert!(output.starts_with("SAVED SEARCHES (1)"));
        assert!(output.ends_with("Drafts: \"rust\", status: draft"));
        assert_eq!(format_saved_searches(&[]), "No saved searches.");
    }
}
