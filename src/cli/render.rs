//! Table rendering for dashboard snapshots.
//!
//! Consumes the aggregation outputs in the order provided; no re-sorting
//! happens here. Today's row, the alert state, and every entry tied for the
//! maximum count get highlighted.

use owo_colors::OwoColorize;
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::dashboard::{DashboardSnapshot, WeekView};
use crate::domain::Bucket;

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Reports")]
    count: u64,
    #[tabled(rename = "Trend")]
    bar: String,
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Reports")]
    count: u64,
}

/// Render the full dashboard.
pub fn dashboard(snapshot: &DashboardSnapshot) {
    output::section("Today");
    if snapshot.alert {
        output::key_value(
            "Reports today",
            format!(
                "{} {}",
                snapshot.today_count.red().bold(),
                format!("(alert: above threshold {})", snapshot.threshold).red()
            ),
        );
    } else {
        output::key_value(
            "Reports today",
            format!(
                "{} (threshold {})",
                snapshot.today_count.green(),
                snapshot.threshold
            ),
        );
    }
    output::key_value("Total reports", snapshot.total_reports);
    output::key_value("Total users", snapshot.total_users);

    week(&snapshot.this_week, "This week");
    week(&snapshot.last_week, "Last week");

    monthly_series("Reports per day (this month)", &snapshot.reports_per_day_of_month);
    monthly_series("New users per day (this month)", &snapshot.users_per_day_of_month);
    println!();
}

fn week(view: &WeekView, title: &str) {
    output::section(&format!(
        "{title} ({} – {})",
        view.window.start.format("%Y-%m-%d"),
        view.window.end.format("%Y-%m-%d")
    ));

    let peak = view.trend.iter().map(|row| row.count).max().unwrap_or(0);
    let rows: Vec<TrendRow> = view
        .trend
        .iter()
        .map(|row| TrendRow {
            day: if row.is_today {
                format!("{}", row.label.bold())
            } else {
                row.label.clone()
            },
            count: row.count,
            bar: bar(row.count, peak),
        })
        .collect();
    print_table(Table::new(rows));

    ranking("Tags", &view.tags);
    ranking("Neighborhoods", &view.neighborhoods);
}

fn ranking(title: &str, bucket: &Bucket) {
    if bucket.is_empty() {
        output::note(&format!("{title}: no data for this window"));
        return;
    }

    let max = bucket.max_count();
    let rows: Vec<RankRow> = bucket
        .rank_descending()
        .into_iter()
        .enumerate()
        .map(|(i, (key, count))| RankRow {
            rank: i + 1,
            // Every entry tied for the maximum is flagged, not just the first.
            key: if count == max {
                format!("{}", key.yellow().bold())
            } else {
                key
            },
            count,
        })
        .collect();

    output::note(title);
    print_table(Table::new(rows));
}

fn monthly_series(title: &str, counts: &[u64]) {
    output::section(title);
    let line: Vec<String> = counts.iter().map(u64::to_string).collect();
    output::note(&line.join(" "));
}

/// A proportional bar, ten cells wide at the weekly peak.
fn bar(count: u64, peak: u64) -> String {
    if peak == 0 {
        return String::new();
    }
    let cells = ((count * 10) / peak.max(1)) as usize;
    "█".repeat(cells)
}

fn print_table(table: Table) {
    for line in table.to_string().lines() {
        println!("  {line}");
    }
}
