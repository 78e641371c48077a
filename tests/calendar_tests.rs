//! Boundary properties of the calendar math, checked over a sweep of dates.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use vigia::domain::calendar;

fn offsets() -> Vec<FixedOffset> {
    vec![
        FixedOffset::east_opt(0).expect("offset"),
        FixedOffset::west_opt(6 * 3600).expect("offset"),
        FixedOffset::east_opt(9 * 3600 + 1800).expect("offset"),
    ]
}

fn sweep() -> impl Iterator<Item = DateTime<Utc>> {
    // Every third day across two years, covering a leap February.
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 15, 30, 0)
        .single()
        .expect("instant");
    (0..240).map(move |i| start + Duration::days(i * 3))
}

#[test]
fn start_of_week_is_always_monday_at_local_midnight() {
    for offset in offsets() {
        for now in sweep() {
            let week = calendar::week_range(offset, now);
            assert_eq!(week.start.weekday(), Weekday::Mon);
            assert_eq!(
                (week.start.hour(), week.start.minute(), week.start.second()),
                (0, 0, 0)
            );
            assert_eq!(week.start.timestamp_subsec_millis(), 0);
        }
    }
}

#[test]
fn end_of_week_is_start_plus_six_days_at_day_end() {
    for offset in offsets() {
        for now in sweep() {
            let week = calendar::week_range(offset, now);
            let expected_end_date = week.start.date_naive() + Duration::days(6);
            assert_eq!(week.end.date_naive(), expected_end_date);
            assert_eq!(
                (week.end.hour(), week.end.minute(), week.end.second()),
                (23, 59, 59)
            );
            assert_eq!(week.end.timestamp_subsec_millis(), 999);
        }
    }
}

#[test]
fn last_week_starts_seven_days_earlier_and_never_overlaps() {
    for offset in offsets() {
        for now in sweep() {
            let this_week = calendar::week_range(offset, now);
            let last_week = calendar::last_week_range(offset, now);
            assert_eq!(last_week.start, this_week.start - Duration::days(7));
            assert!(last_week.end < this_week.start);
            assert_eq!(last_week.day_count(), 7);
            assert_eq!(this_week.day_count(), 7);
        }
    }
}

#[test]
fn today_range_spans_exactly_one_local_day() {
    for offset in offsets() {
        for now in sweep() {
            let today = calendar::today_range(offset, now);
            assert_eq!(today.day_count(), 1);
            assert!(today.contains(now));
            assert_eq!(today.start.date_naive(), calendar::local_date(offset, now));
        }
    }
}

#[test]
fn month_range_starts_on_day_one_and_ends_on_last_day() {
    for offset in offsets() {
        for now in sweep() {
            let month = calendar::month_range(offset, now);
            assert_eq!(month.start.date_naive().day(), 1);
            assert_eq!(
                month.end.date_naive().day(),
                calendar::days_in_month(month.start.date_naive())
            );
            assert!(month.contains(now));
            assert!(month.spans_full_month());
        }
    }
}

#[test]
fn date_keys_are_unique_per_day_and_labels_are_not_keys() {
    let a = NaiveDate::from_ymd_opt(2026, 3, 2).expect("date");
    let b = NaiveDate::from_ymd_opt(2026, 3, 9).expect("date");
    // Same weekday, different key.
    assert_eq!(calendar::day_label(a).split(' ').next(), calendar::day_label(b).split(' ').next());
    assert_ne!(calendar::date_key(a), calendar::date_key(b));
}
