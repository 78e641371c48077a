//! In-process document store.
//!
//! Behaves like the remote store from a consumer's point of view: every
//! mutation publishes a full snapshot of the affected collection. Backs
//! demos, `--once` runs, and tests; can be pre-loaded from a JSON seed
//! file.

use std::path::Path;

use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::info;

use crate::domain::{Report, ReportDraft, ReportId, UserAccount};
use crate::error::Result;

use super::{DocumentStore, SnapshotFeed, SnapshotHub};

#[derive(Default)]
struct Collections {
    reports: Vec<Report>,
    users: Vec<UserAccount>,
}

/// Seed file shape: `{"reports": [...], "users": [...]}`, both optional.
#[derive(Debug, Default, Deserialize)]
struct SeedFile {
    #[serde(default)]
    reports: Vec<Report>,
    #[serde(default)]
    users: Vec<UserAccount>,
}

pub struct MemoryStore {
    offset: FixedOffset,
    collections: Mutex<Collections>,
    reports_hub: SnapshotHub<Report>,
    users_hub: SnapshotHub<UserAccount>,
}

impl MemoryStore {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            collections: Mutex::new(Collections::default()),
            reports_hub: SnapshotHub::new(),
            users_hub: SnapshotHub::new(),
        }
    }

    /// Build a store pre-loaded from a JSON seed file.
    pub fn with_seed(offset: FixedOffset, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let seed: SeedFile = serde_json::from_str(&content)?;
        info!(
            reports = seed.reports.len(),
            users = seed.users.len(),
            seed = %path.display(),
            "loaded memory store seed"
        );

        let store = Self::new(offset);
        {
            let mut collections = store.collections.lock();
            collections.reports = seed.reports;
            collections.users = seed.users;
        }
        Ok(store)
    }

    /// Directly add a user account, e.g. from a seed or a test.
    pub fn insert_user(&self, user: UserAccount) {
        let snapshot = {
            let mut collections = self.collections.lock();
            collections.users.push(user);
            collections.users.clone()
        };
        self.users_hub.publish(snapshot);
    }

    fn publish_reports(&self) {
        let snapshot = self.collections.lock().reports.clone();
        self.reports_hub.publish(snapshot);
    }

    fn publish_users(&self) {
        let snapshot = self.collections.lock().users.clone();
        self.users_hub.publish(snapshot);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn subscribe_reports(&self) -> Result<SnapshotFeed<Report>> {
        let feed = self.reports_hub.attach();
        // Deliver the current state immediately, like a live watch does.
        self.publish_reports();
        Ok(feed)
    }

    async fn subscribe_users(&self) -> Result<SnapshotFeed<UserAccount>> {
        let feed = self.users_hub.attach();
        self.publish_users();
        Ok(feed)
    }

    async fn insert_report(&self, draft: ReportDraft) -> Result<ReportId> {
        let now = Utc::now();
        let local = now.with_timezone(&self.offset);
        let id = ReportId::generate();
        let report = Report {
            id: id.clone(),
            description: draft.description,
            tags: draft.tags,
            neighborhood: draft.neighborhood,
            created_at: Some(now),
            submitted_date: Some(local.format("%-d %B %Y").to_string()),
            submitted_time: Some(local.format("%H:%M:%S").to_string()),
        };

        {
            let mut collections = self.collections.lock();
            collections.reports.push(report);
        }
        self.publish_reports();
        Ok(id)
    }
}
