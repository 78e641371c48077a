//! Day, week, and month boundary math in a fixed UTC offset.
//!
//! Weeks start on Monday. Every range is inclusive: it runs from local
//! midnight of its first day to 23:59:59.999 of its last. All functions are
//! total over valid chrono dates.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc,
};

use crate::domain::window::TimeWindow;

/// Interpret a local wall-clock time in the given offset.
///
/// A fixed offset has no gaps or folds, so the mapping is always single.
fn at_local(offset: FixedOffset, ndt: NaiveDateTime) -> DateTime<FixedOffset> {
    match ndt.and_local_timezone(offset) {
        chrono::LocalResult::Single(dt) => dt,
        _ => DateTime::from_naive_utc_and_offset(ndt - offset, offset),
    }
}

/// Local midnight of the given date.
pub fn day_start(offset: FixedOffset, date: NaiveDate) -> DateTime<FixedOffset> {
    at_local(offset, date.and_hms_opt(0, 0, 0).expect("valid wall-clock time"))
}

/// Local 23:59:59.999 of the given date.
pub fn day_end(offset: FixedOffset, date: NaiveDate) -> DateTime<FixedOffset> {
    at_local(
        offset,
        date.and_hms_milli_opt(23, 59, 59, 999)
            .expect("valid wall-clock time"),
    )
}

/// The local calendar date of `now` in the given offset.
pub fn local_date(offset: FixedOffset, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Monday of the week containing `date`.
///
/// `num_days_from_monday` is chrono's form of the `(dow + 6) % 7` offset
/// with Sunday numbered 0.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Monday 00:00:00.000 through Sunday 23:59:59.999 of the week containing `now`.
pub fn week_range(offset: FixedOffset, now: DateTime<Utc>) -> TimeWindow {
    let monday = start_of_week(local_date(offset, now));
    let sunday = monday + Duration::days(6);
    TimeWindow::new(day_start(offset, monday), day_end(offset, sunday))
}

/// The full week immediately before the one containing `now`.
///
/// Always contiguous with and never overlapping [`week_range`].
pub fn last_week_range(offset: FixedOffset, now: DateTime<Utc>) -> TimeWindow {
    let monday = start_of_week(local_date(offset, now)) - Duration::days(7);
    let sunday = monday + Duration::days(6);
    TimeWindow::new(day_start(offset, monday), day_end(offset, sunday))
}

/// Local midnight through 23:59:59.999 of the current date.
pub fn today_range(offset: FixedOffset, now: DateTime<Utc>) -> TimeWindow {
    let today = local_date(offset, now);
    TimeWindow::new(day_start(offset, today), day_end(offset, today))
}

/// First day 00:00:00.000 through last day 23:59:59.999 of the month
/// containing `now`.
pub fn month_range(offset: FixedOffset, now: DateTime<Utc>) -> TimeWindow {
    let date = local_date(offset, now);
    let first = date.with_day(1).expect("day 1 exists in every month");
    let last = first + Duration::days(i64::from(days_in_month(date)) - 1);
    TimeWindow::new(day_start(offset, first), day_end(offset, last))
}

/// Number of calendar days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let first_of_next =
        NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("valid month start");
    (first_of_next - Duration::days(1)).day()
}

/// Display label for a day row, e.g. "Monday 3 Aug". Never used as a bucket
/// key; key identity is [`date_key`].
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {} {}", date.format("%A"), date.day(), date.format("%b"))
}

/// Stable bucket-key identity for a calendar date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
