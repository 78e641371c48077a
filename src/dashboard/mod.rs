//! Dashboard state recomputed from each snapshot pair.
//!
//! One call to [`recompute`] consumes a single immutable reports snapshot
//! plus the latest users snapshot and produces every figure the original
//! dashboard showed: the daily KPI card, both weekly trend tables, tag and
//! neighborhood rankings for this week and last, and the monthly per-day
//! series. Nothing is carried over between calls.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::aggregate::{
    bucket_by_day, bucket_by_location, bucket_by_tag, count_in_window, per_day_of_month, DayCount,
};
use crate::config::DashboardConfig;
use crate::domain::calendar::{self, local_date};
use crate::domain::{Bucket, Report, TimeWindow, UserAccount};
use crate::error::Result;

/// Loading state surfaced to the presentation layer.
///
/// A subscription failure moves the dashboard to `Failed`; stale data is
/// never presented as current after that.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(DashboardSnapshot),
    Failed(String),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }
}

/// Buckets for one week window, with its bounds for display.
#[derive(Debug, Clone)]
pub struct WeekView {
    pub window: TimeWindow,
    pub trend: Vec<DayCount>,
    pub tags: Bucket,
    pub neighborhoods: Bucket,
}

/// Everything derived from one snapshot pair.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    /// Reports created today.
    pub today_count: u64,
    /// Unconditional totals; these include documents without a valid
    /// creation instant.
    pub total_reports: u64,
    pub total_users: u64,
    /// Strict greater-than comparison against the configured threshold.
    pub alert: bool,
    pub threshold: u64,
    pub this_week: WeekView,
    pub last_week: WeekView,
    /// Index i holds the count for day-of-month i + 1.
    pub reports_per_day_of_month: Vec<u64>,
    pub users_per_day_of_month: Vec<u64>,
}

/// Recompute the full dashboard from scratch.
pub fn recompute(
    config: &DashboardConfig,
    reports: &[Report],
    users: &[UserAccount],
    now: DateTime<Utc>,
) -> Result<DashboardSnapshot> {
    let offset = config.offset()?;
    let today = local_date(offset, now);

    let undated = reports.iter().filter(|r| r.created_at.is_none()).count();
    if undated > 0 {
        debug!(undated, "reports without a valid creation instant excluded from windowed buckets");
    }

    let today_window = calendar::today_range(offset, now);
    let this_week_window = calendar::week_range(offset, now);
    let last_week_window = calendar::last_week_range(offset, now);
    let month_window = calendar::month_range(offset, now);

    let today_count = count_in_window(reports, &today_window);

    let week_view = |window: TimeWindow| WeekView {
        trend: bucket_by_day(reports, &window, today),
        tags: bucket_by_tag(reports, &window),
        neighborhoods: bucket_by_location(reports, &window),
        window,
    };

    Ok(DashboardSnapshot {
        generated_at: now,
        today_count,
        total_reports: reports.len() as u64,
        total_users: users.len() as u64,
        alert: today_count > config.daily_alert_threshold,
        threshold: config.daily_alert_threshold,
        this_week: week_view(this_week_window),
        last_week: week_view(last_week_window),
        reports_per_day_of_month: per_day_of_month(reports, &month_window),
        users_per_day_of_month: per_day_of_month(users, &month_window),
    })
}
