use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use super::error::CalendarError;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for an entire month.
    pub fn month(year: i32, month: u32) -> Result<Self, CalendarError> {
        let invalid = CalendarError::InvalidMonth { year, month };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid.clone())?;

        // First of the next month, minus one day.
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or(invalid)?;

        Ok(Self { start, end })
    }

    /// Creates the Sunday-to-Saturday week containing the given date.
    pub fn week(date: NaiveDate) -> Self {
        let start = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days in the range.
    pub fn len_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Every date in the range, in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take(self.len_days()).collect()
    }

    /// First instant of the range, midnight UTC.
    pub fn start_instant(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// Last whole second of the range, 23:59:59 UTC on the end date.
    pub fn end_instant(&self) -> DateTime<Utc> {
        (self.end.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::seconds(1)).and_utc()
    }
}
