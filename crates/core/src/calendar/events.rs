use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::range::DateRange;
use crate::planning::PlannedPost;
use crate::posts::{BlogPost, PostStatus};

/// What a calendar event stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Published,
    Draft,
    Planned,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Published => "published",
            EventKind::Draft => "draft",
            EventKind::Planned => "planned",
        }
    }
}

/// A post or planned post placed on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<BlogPost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_post: Option<PlannedPost>,
}

impl CalendarEvent {
    /// Builds the event for a CMS post. Anything not yet published counts
    /// as a draft.
    pub fn from_post(post: BlogPost) -> Self {
        let kind = match post.status {
            PostStatus::Published => EventKind::Published,
            PostStatus::Draft | PostStatus::Scheduled => EventKind::Draft,
        };
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            date: post.display_date().date_naive(),
            kind,
            post: Some(post),
            planned_post: None,
        }
    }

    pub fn from_planned(planned: PlannedPost) -> Self {
        Self {
            id: planned.id.to_string(),
            title: planned.title.clone(),
            date: planned.planned_date,
            kind: EventKind::Planned,
            post: None,
            planned_post: Some(planned),
        }
    }
}

/// Merges posts and planned posts into the events of one range.
///
/// Posts are expected to be fetched for the range already; planned posts
/// are filtered here. Events come back ordered by date, posts before
/// planned posts on the same day.
pub fn build_calendar_events(
    posts: Vec<BlogPost>,
    planned: Vec<PlannedPost>,
    range: &DateRange,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = posts
        .into_iter()
        .map(CalendarEvent::from_post)
        .chain(
            planned
                .into_iter()
                .filter(|p| range.contains(p.planned_date))
                .map(CalendarEvent::from_planned),
        )
        .collect();

    events.sort_by_key(|e| e.date);
    events
}

/// Groups events by date.
pub fn group_events_by_date(events: &[CalendarEvent]) -> BTreeMap<NaiveDate, Vec<&CalendarEvent>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&CalendarEvent>> = BTreeMap::new();

    for event in events {
        grouped.entry(event.date).or_default().push(event);
    }

    grouped
}

/// Number of events of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub published: usize,
    pub draft: usize,
    pub planned: usize,
}

pub fn count_events(events: &[CalendarEvent]) -> EventCounts {
    events
        .iter()
        .fold(EventCounts::default(), |mut counts, event| {
            match event.kind {
                EventKind::Published => counts.published += 1,
                EventKind::Draft => counts.draft += 1,
                EventKind::Planned => counts.planned += 1,
            }
            counts
        })
}

/// One cell of a month view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading and trailing days of neighbouring months.
    pub in_month: bool,
    pub events: Vec<CalendarEvent>,
}

/// Lays out a month as whole Sunday-to-Saturday weeks with its events.
pub fn build_month_grid(month: &DateRange, events: &[CalendarEvent]) -> Vec<CalendarDay> {
    let first = DateRange::week(month.start).start;
    let last = DateRange::week(month.end).end;
    let grouped = group_events_by_date(events);

    DateRange { start: first, end: last }
        .dates()
        .into_iter()
        .map(|date| CalendarDay {
            date,
            in_month: month.contains(date),
            events: grouped
                .get(&date)
                .map(|day| day.iter().map(|e| (*e).clone()).collect())
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::{NewPlannedPost, Priority};
    use crate::posts::demo_posts;
    use chrono::{Datelike, Weekday};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn planned(title: &str, on: NaiveDate) -> PlannedPost {
        NewPlannedPost::new(title, on)
            .with_priority(Priority::High)
            .into_planned_post(Uuid::new_v4())
    }

    #[test]
    fn test_post_event_kinds() {
        let posts = demo_posts();
        let published = CalendarEvent::from_post(posts[0].clone());
        let scheduled = CalendarEvent::from_post(posts[3].clone());

        assert_eq!(published.kind, EventKind::Published);
        assert_eq!(published.date, date(2024, 3, 18));
        assert_eq!(scheduled.kind, EventKind::Draft);
        // Unpublished posts sit on their creation date.
        assert_eq!(scheduled.date, date(2024, 3, 20));
    }

    #[test]
    fn test_build_events_filters_planned_by_range() {
        let march = DateRange::month(2024, 3).unwrap();
        let posts: Vec<_> = demo_posts().into_iter().take(2).collect();
        let plans = vec![
            planned("inside", date(2024, 3, 2)),
            planned("outside", date(2024, 4, 1)),
        ];

        let events = build_calendar_events(posts, plans, &march);

        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "inside",
                "Building an Editorial Calendar",
                "Getting Started with Headless CMS"
            ]
        );
        assert_eq!(events[0].kind, EventKind::Planned);
        assert!(events[0].planned_post.is_some());
    }

    #[test]
    fn test_group_and_count() {
        let march = DateRange::month(2024, 3).unwrap();
        let posts: Vec<_> = demo_posts().into_iter().take(1).collect();
        let plans = vec![
            planned("same day", date(2024, 3, 18)),
            planned("other day", date(2024, 3, 20)),
        ];
        let events = build_calendar_events(posts, plans, &march);

        let grouped = group_events_by_date(&events);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&date(2024, 3, 18)].len(), 2);

        let counts = count_events(&events);
        assert_eq!(
            counts,
            EventCounts {
                published: 1,
                draft: 0,
                planned: 2
            }
        );
    }

    #[test]
    fn test_month_grid_covers_whole_weeks() {
        // June 2024 starts on a Saturday and ends on a Sunday.
        let june = DateRange::month(2024, 6).unwrap();
        let events = vec![CalendarEvent::from_planned(planned("x", date(2024, 6, 15)))];

        let grid = build_month_grid(&june, &events);

        assert_eq!(grid.len() % 7, 0);
        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0].date, date(2024, 5, 26));
        assert_eq!(grid[0].date.weekday(), Weekday::Sun);
        assert!(!grid[0].in_month);
        assert_eq!(grid.last().unwrap().date, date(2024, 7, 6));
        assert_eq!(grid.iter().filter(|d| d.in_month).count(), 30);

        let fifteenth = grid.iter().find(|d| d.date == date(2024, 6, 15)).unwrap();
        assert_eq!(fifteenth.events.len(), 1);
    }

    #[test]
    fn test_event_serializes_type_field() {
        let event = CalendarEvent::from_planned(planned("x", date(2024, 6, 15)));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "planned");
        assert_eq!(value["date"], "2024-06-15");
        assert!(value.get("post").is_none());
    }
}
