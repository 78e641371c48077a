//! Vigia - live civic-report analytics.
//!
//! This crate subscribes to a remote document store holding citizen reports
//! and user accounts, and recomputes an aggregated dashboard from scratch
//! on every snapshot: daily KPI, weekly trend tables, tag and neighborhood
//! rankings, and monthly per-day series.
//!
//! # Architecture
//!
//! Snapshot in, buckets out:
//!
//! - **`store`** - Live subscription adapters delivering full-collection
//!   snapshots; one shared [`store::SnapshotHub`] per collection fans a
//!   single upstream subscription out to every consumer.
//! - **`aggregate`** - Pure bucketing over one immutable snapshot:
//!   windowed counts, per-day trends, tag and neighborhood buckets,
//!   per-day-of-month series.
//! - **`dashboard`** - Recomputes every figure atomically per snapshot and
//!   surfaces a loading/ready/failed state.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Reports, users, time windows, buckets, calendar math
//! - [`aggregate`] - The aggregation engine
//! - [`dashboard`] - Dashboard state derived per snapshot
//! - [`store`] - Document-store backends (in-memory and WebSocket)
//! - [`app`] - Application orchestration
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use vigia::aggregate::{bucket_by_tag, count_in_window};
//! use vigia::domain::calendar;
//! use chrono::{FixedOffset, Utc};
//!
//! let offset = FixedOffset::west_opt(6 * 3600).unwrap();
//! let week = calendar::week_range(offset, Utc::now());
//! let reports = vec![];
//! let tags = bucket_by_tag(&reports, &week);
//! assert_eq!(count_in_window(&reports, &week), 0);
//! assert!(tags.is_empty());
//! ```

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
