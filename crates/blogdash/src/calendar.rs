//! Month view assembled from CMS posts and local planned posts.

use serde::Serialize;
use thiserror::Error;

use blogdash_core::calendar::{
    build_calendar_events, build_month_grid, count_events, CalendarDay, CalendarError,
    CalendarEvent, DateRange, EventCounts,
};

use crate::cms::{CmsError, CmsService};
use crate::planning::PlannedPostStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarViewError {
    #[error(transparent)]
    Range(#[from] CalendarError),
    #[error(transparent)]
    Cms(#[from] CmsError),
}

/// One month laid out as whole weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub counts: EventCounts,
    pub days: Vec<CalendarDay>,
}

/// Events in `range`: posts by display date plus planned posts.
///
/// Posts come from the cached full listing so drafts show up on the day
/// they were created.
pub async fn load_events(
    cms: &CmsService,
    planning: &PlannedPostStore,
    range: &DateRange,
) -> Result<Vec<CalendarEvent>, CmsError> {
    let posts: Vec<_> = cms
        .fetch_all_posts()
        .await?
        .into_iter()
        .filter(|post| range.contains(post.display_date().date_naive()))
        .collect();
    let planned = planning.planned_posts_between(range.start, range.end);

    Ok(build_calendar_events(posts, planned, range))
}

pub async fn load_month_view(
    cms: &CmsService,
    planning: &PlannedPostStore,
    year: i32,
    month: u32,
) -> Result<MonthView, CalendarViewError> {
    let range = DateRange::month(year, month)?;
    let events = load_events(cms, planning, &range).await?;

    tracing::debug!(year, month, events = events.len(), "Loaded month view");
    Ok(MonthView {
        year,
        month,
        counts: count_events(&events),
        days: build_month_grid(&range, &events),
    })
}
