//! Live document-store subscriptions.
//!
//! The read path is snapshot replay: every mutation re-delivers the entire
//! current collection, and consumers replace their working set wholesale
//! (no diffing, no incremental merge). One upstream subscription per
//! collection is shared through a [`SnapshotHub`] that fans snapshots out
//! to any number of consumers and tears the upstream down when the last
//! one detaches.

pub mod hub;
pub mod memory;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Report, ReportDraft, ReportId, UserAccount};
use crate::error::Result;

pub use hub::{SnapshotFeed, SnapshotHub};
pub use memory::MemoryStore;
pub use remote::RemoteStore;

/// Collection names used by both backends.
pub const REPORTS_COLLECTION: &str = "reports";
pub const USERS_COLLECTION: &str = "users";

/// A full-collection snapshot. `seq` increases with every delivery on the
/// same subscription.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub docs: Arc<Vec<T>>,
    pub seq: u64,
}

impl<T> Snapshot<T> {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// What a consumer currently knows about a collection.
#[derive(Debug, Clone, Default)]
pub enum SnapshotState<T> {
    /// No snapshot delivered yet.
    #[default]
    Loading,
    Ready(Snapshot<T>),
    /// The subscription reported an error; prior data is stale.
    Failed(String),
}

impl<T> SnapshotState<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, SnapshotState::Failed(_))
    }
}

/// The document-store seam.
///
/// Subscriptions deliver snapshots serially per collection; the two
/// collections may interleave in any order relative to each other.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Subscribe to the reports collection.
    async fn subscribe_reports(&self) -> Result<SnapshotFeed<Report>>;

    /// Subscribe to the users collection.
    async fn subscribe_users(&self) -> Result<SnapshotFeed<UserAccount>>;

    /// Write path: persist a new report. The store stamps the server-side
    /// creation instant and the formatted submission date/time strings.
    async fn insert_report(&self, draft: ReportDraft) -> Result<ReportId>;
}
