//! Domain types: reports, users, time windows, and count buckets.

pub mod bucket;
pub mod calendar;
pub mod report;
pub mod window;

pub use bucket::Bucket;
pub use report::{Created, Report, ReportDraft, ReportId, UserAccount};
pub use window::TimeWindow;
