//! Calendar view model: posts and planned posts laid out by day.

mod error;
mod events;
mod range;

pub use error::CalendarError;
pub use events::{
    build_calendar_events, build_month_grid, count_events, group_events_by_date, CalendarDay,
    CalendarEvent, EventCounts, EventKind,
};
pub use range::DateRange;
