//! A scripted `DocumentStore` driven directly by tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{Report, ReportDraft, ReportId, UserAccount};
use crate::error::Result;
use crate::store::{DocumentStore, SnapshotFeed, SnapshotHub};

/// Exposes both hubs so a test can publish snapshots or inject failures at
/// exact points, and records every draft passed to the write path.
#[derive(Default)]
pub struct ScriptedStore {
    pub reports: SnapshotHub<Report>,
    pub users: SnapshotHub<UserAccount>,
    inserted: Mutex<Vec<ReportDraft>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drafts received on the write path, in order.
    pub fn inserted(&self) -> Vec<ReportDraft> {
        self.inserted.lock().clone()
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn subscribe_reports(&self) -> Result<SnapshotFeed<Report>> {
        Ok(self.reports.attach())
    }

    async fn subscribe_users(&self) -> Result<SnapshotFeed<UserAccount>> {
        Ok(self.users.attach())
    }

    async fn insert_report(&self, draft: ReportDraft) -> Result<ReportId> {
        let id = ReportId::generate();
        let report = Report {
            id: id.clone(),
            description: draft.description.clone(),
            tags: draft.tags.clone(),
            neighborhood: draft.neighborhood.clone(),
            created_at: Some(Utc::now()),
            submitted_date: None,
            submitted_time: None,
        };
        self.inserted.lock().push(draft);

        let mut docs = match self.reports.current() {
            crate::store::SnapshotState::Ready(snapshot) => snapshot.docs.as_ref().clone(),
            _ => Vec::new(),
        };
        docs.push(report);
        self.reports.publish(docs);
        Ok(id)
    }
}
