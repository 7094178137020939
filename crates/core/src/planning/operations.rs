use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::PlannedPostError;
use super::types::{NewPlannedPost, PlannedPost, PlannedPostPatch, PlannedStatus};

const MAX_TITLE_LEN: usize = 200;

fn validate_title(title: &str) -> Result<(), PlannedPostError> {
    if title.trim().is_empty() {
        return Err(PlannedPostError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(PlannedPostError::TitleTooLong);
    }
    Ok(())
}

fn validate_read_time(minutes: Option<u32>) -> Result<(), PlannedPostError> {
    match minutes {
        Some(0) => Err(PlannedPostError::InvalidReadTime),
        _ => Ok(()),
    }
}

/// Validates a planned post before it is added.
pub fn validate_planned_post(post: &NewPlannedPost) -> Result<(), PlannedPostError> {
    validate_title(&post.title)?;
    validate_read_time(post.estimated_read_time)
}

/// Validates the fields a patch supplies.
pub fn validate_planned_patch(patch: &PlannedPostPatch) -> Result<(), PlannedPostError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    validate_read_time(patch.estimated_read_time)
}

/// Orders planned posts by priority (high first), then by planned date,
/// then by title.
pub fn sort_by_priority(posts: &mut [PlannedPost]) {
    posts.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then(a.planned_date.cmp(&b.planned_date))
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Planned posts whose date falls within `[start, end]`.
pub fn filter_by_date_range(
    posts: &[PlannedPost],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<PlannedPost> {
    posts
        .iter()
        .filter(|p| p.planned_date >= start && p.planned_date <= end)
        .cloned()
        .collect()
}

/// Planned posts grouped into one column per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningBoard {
    pub planned: Vec<PlannedPost>,
    pub in_progress: Vec<PlannedPost>,
    pub completed: Vec<PlannedPost>,
}

impl PlanningBoard {
    /// Returns the column for a status.
    pub fn column(&self, status: PlannedStatus) -> &[PlannedPost] {
        match status {
            PlannedStatus::Planned => &self.planned,
            PlannedStatus::InProgress => &self.in_progress,
            PlannedStatus::Completed => &self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.planned.len() + self.in_progress.len() + self.completed.len()
    }
}

/// Groups planned posts by status, each column sorted with [`sort_by_priority`].
pub fn build_planning_board(posts: &[PlannedPost]) -> PlanningBoard {
    let mut board = PlanningBoard::default();
    for post in posts {
        let column = match post.status {
            PlannedStatus::Planned => &mut board.planned,
            PlannedStatus::InProgress => &mut board.in_progress,
            PlannedStatus::Completed => &mut board.completed,
        };
        column.push(post.clone());
    }
    sort_by_priority(&mut board.planned);
    sort_by_priority(&mut board.in_progress);
    sort_by_priority(&mut board.completed);
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::Priority;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn planned(title: &str, day: u32, status: PlannedStatus, priority: Priority) -> PlannedPost {
        NewPlannedPost::new(title, date(2025, 1, day))
            .with_status(status)
            .with_priority(priority)
            .into_planned_post(Uuid::new_v4())
    }

    #[test]
    fn test_validate_planned_post() {
        assert!(validate_planned_post(&NewPlannedPost::new("Ok", date(2025, 1, 1))).is_ok());
        assert_eq!(
            validate_planned_post(&NewPlannedPost::new("", date(2025, 1, 1))),
            Err(PlannedPostError::EmptyTitle)
        );
        assert_eq!(
            validate_planned_post(&NewPlannedPost::new("y".repeat(201), date(2025, 1, 1))),
            Err(PlannedPostError::TitleTooLong)
        );
        assert_eq!(
            validate_planned_post(
                &NewPlannedPost::new("Ok", date(2025, 1, 1)).with_estimated_read_time(0)
            ),
            Err(PlannedPostError::InvalidReadTime)
        );
    }

    #[test]
    fn test_validate_planned_patch() {
        assert!(validate_planned_patch(&PlannedPostPatch::default()).is_ok());
        let patch = PlannedPostPatch {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_planned_patch(&patch),
            Err(PlannedPostError::EmptyTitle)
        );
    }

    #[test]
    fn test_sort_by_priority_then_date() {
        let mut posts = vec![
            planned("low", 1, PlannedStatus::Planned, Priority::Low),
            planned("high-late", 9, PlannedStatus::Planned, Priority::High),
            planned("high-early", 2, PlannedStatus::Planned, Priority::High),
            planned("medium", 1, PlannedStatus::Planned, Priority::Medium),
        ];

        sort_by_priority(&mut posts);

        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["high-early", "high-late", "medium", "low"]);
    }

    #[test]
    fn test_build_planning_board() {
        let posts = vec![
            planned("a", 1, PlannedStatus::Planned, Priority::Low),
            planned("b", 2, PlannedStatus::InProgress, Priority::Medium),
            planned("c", 3, PlannedStatus::Planned, Priority::High),
            planned("d", 4, PlannedStatus::Completed, Priority::Medium),
        ];

        let board = build_planning_board(&posts);

        assert_eq!(board.total(), 4);
        assert_eq!(board.planned.len(), 2);
        assert_eq!(board.planned[0].title, "c");
        assert_eq!(board.column(PlannedStatus::InProgress)[0].title, "b");
        assert_eq!(board.column(PlannedStatus::Completed)[0].title, "d");
    }

    #[test]
    fn test_empty_board() {
        let board = build_planning_board(&[]);
        assert_eq!(board, PlanningBoard::default());
        assert_eq!(board.total(), 0);
    }

    #[test]
    fn test_filter_by_date_range_is_inclusive() {
        let posts = vec![
            planned("first", 1, PlannedStatus::Planned, Priority::Low),
            planned("mid", 15, PlannedStatus::Planned, Priority::Low),
            planned("last", 31, PlannedStatus::Planned, Priority::Low),
        ];

        let filtered = filter_by_date_range(&posts, date(2025, 1, 1), date(2025, 1, 15));
        let titles: Vec<_> = filtered.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "mid"]);
    }
}
