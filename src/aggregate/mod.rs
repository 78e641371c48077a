//! The aggregation engine: pure, synchronous bucketing over one snapshot.
//!
//! Every function takes an immutable slice and recomputes from scratch; no
//! state is carried between snapshots. Records without a valid creation
//! instant are skipped by every windowed function but still count toward
//! snapshot totals, which the caller takes from the slice length.

use chrono::{Datelike, NaiveDate};

use crate::domain::calendar::{date_key, day_label, days_in_month};
use crate::domain::report::Created;
use crate::domain::window::TimeWindow;
use crate::domain::{Bucket, Report};

/// One pre-seeded day row of a weekly trend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCount {
    /// Stable bucket identity (`YYYY-MM-DD`).
    pub key: String,
    /// Display label; never used for equality.
    pub label: String,
    pub count: u64,
    pub is_today: bool,
}

/// Count items whose creation instant falls inside `window`, inclusive on
/// both ends.
pub fn count_in_window<T: Created>(items: &[T], window: &TimeWindow) -> u64 {
    items
        .iter()
        .filter_map(Created::created_at)
        .filter(|instant| window.contains(*instant))
        .count() as u64
}

/// Bucket items per calendar day of `window`.
///
/// Every day of the window gets a row, zero-filled, in chronological order.
/// An item whose local day key is not among the pre-seeded keys is dropped,
/// never added as a new row. `today` marks the row whose date key matches.
pub fn bucket_by_day<T: Created>(
    items: &[T],
    window: &TimeWindow,
    today: NaiveDate,
) -> Vec<DayCount> {
    let offset = window.start.offset().to_owned();
    let mut rows: Vec<DayCount> = window
        .iter_days()
        .map(|date| DayCount {
            key: date_key(date),
            label: day_label(date),
            count: 0,
            is_today: date == today,
        })
        .collect();

    for instant in items.iter().filter_map(Created::created_at) {
        if !window.contains(instant) {
            continue;
        }
        let key = date_key(instant.with_timezone(&offset).date_naive());
        if let Some(row) = rows.iter_mut().find(|row| row.key == key) {
            row.count += 1;
        }
    }

    rows
}

/// Bucket in-window reports by tag.
///
/// Each distinct trimmed non-empty tag of a report increments its own
/// bucket; a report with K tags contributes K increments, and one with no
/// tags contributes nothing.
pub fn bucket_by_tag(reports: &[Report], window: &TimeWindow) -> Bucket {
    let mut bucket = Bucket::new();
    for report in in_window(reports, window) {
        bucket.extend(report.clean_tags());
    }
    bucket
}

/// Bucket in-window reports by neighborhood, one increment per report.
/// Blank or missing neighborhoods land in the "Unknown" sentinel bucket.
pub fn bucket_by_location(reports: &[Report], window: &TimeWindow) -> Bucket {
    let mut bucket = Bucket::new();
    for report in in_window(reports, window) {
        bucket.increment(report.neighborhood_or_unknown());
    }
    bucket
}

/// Per-day-of-month counts over a full-month window.
///
/// The result has one slot per calendar day of the month; index `i` holds
/// the count for day-of-month `i + 1`.
pub fn per_day_of_month<T: Created>(items: &[T], month: &TimeWindow) -> Vec<u64> {
    let offset = month.start.offset().to_owned();
    let mut counts = vec![0u64; days_in_month(month.start_date()) as usize];

    for instant in items.iter().filter_map(Created::created_at) {
        if !month.contains(instant) {
            continue;
        }
        let day = instant.with_timezone(&offset).day() as usize;
        if let Some(slot) = counts.get_mut(day - 1) {
            *slot += 1;
        }
    }

    counts
}

fn in_window<'a>(
    reports: &'a [Report],
    window: &'a TimeWindow,
) -> impl Iterator<Item = &'a Report> {
    reports.iter().filter(|report| {
        report
            .created_at
            .is_some_and(|instant| window.contains(instant))
    })
}
