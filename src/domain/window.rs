//! Inclusive time windows aligned to local-day boundaries.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};

/// An inclusive `[start, end]` interval in the dashboard's fixed offset.
///
/// Windows are always built aligned to day or week boundaries by
/// [`calendar`](crate::domain::calendar); both endpoints are part of the
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// Whether an instant falls inside the window, inclusive on both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// The local calendar date of the window start.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Calendar dates covered by the window, in chronological order.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date_naive();
        let last = self.end.date_naive();
        let len = (last - first).num_days().max(0) as usize + 1;
        (0..len).filter_map(move |i| first.checked_add_signed(Duration::days(i as i64)))
    }

    /// Number of calendar days covered, e.g. 7 for a week window.
    pub fn day_count(&self) -> usize {
        (self.end.date_naive() - self.start.date_naive())
            .num_days()
            .max(0) as usize
            + 1
    }

    /// True when the window covers exactly the month of its start date.
    pub fn spans_full_month(&self) -> bool {
        let start = self.start.date_naive();
        let end = self.end.date_naive();
        start.day() == 1
            && start.month() == end.month()
            && start.year() == end.year()
            && end.day() == super::calendar::days_in_month(start)
    }
}
