//! Application orchestration: feeds in, dashboard states out.
//!
//! The app owns one feed per collection and recomputes the whole dashboard
//! atomically on every snapshot callback, publishing the result once
//! through a watch channel. Dropping the app drops its feeds, which
//! unsubscribes from the store synchronously.

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::{Backend, Config};
use crate::dashboard::{self, LoadState};
use crate::domain::{Report, UserAccount};
use crate::error::Result;
use crate::store::{
    DocumentStore, MemoryStore, RemoteStore, SnapshotFeed, SnapshotState,
};

/// Build the configured store backend.
pub fn build_store(config: &Config) -> Result<std::sync::Arc<dyn DocumentStore>> {
    let offset = config.offset()?;
    match config.store.backend {
        Backend::Memory => {
            let store = match &config.store.seed {
                Some(path) => MemoryStore::with_seed(offset, path)?,
                None => MemoryStore::new(offset),
            };
            Ok(std::sync::Arc::new(store))
        }
        Backend::Remote => Ok(std::sync::Arc::new(RemoteStore::connect(&config.store)?)),
    }
}

/// The dashboard consumer.
pub struct App {
    dashboard: crate::config::DashboardConfig,
    reports_feed: SnapshotFeed<Report>,
    users_feed: SnapshotFeed<UserAccount>,
    state_tx: watch::Sender<LoadState>,
}

impl App {
    /// Subscribe to both collections and return the app plus the state
    /// channel the presentation layer observes.
    pub async fn start(
        config: &Config,
        store: &dyn DocumentStore,
    ) -> Result<(Self, watch::Receiver<LoadState>)> {
        let reports_feed = store.subscribe_reports().await?;
        let users_feed = store.subscribe_users().await?;
        let (state_tx, state_rx) = watch::channel(LoadState::Loading);

        let app = Self {
            dashboard: config.dashboard.clone(),
            reports_feed,
            users_feed,
            state_tx,
        };
        Ok((app, state_rx))
    }

    /// Process snapshot callbacks until every observer of the state channel
    /// is gone or a subscription closes.
    pub async fn run(mut self) -> Result<()> {
        loop {
            self.refresh();
            if self.state_tx.is_closed() {
                debug!("state channel closed, stopping dashboard loop");
                return Ok(());
            }
            tokio::select! {
                changed = self.reports_feed.changed() => changed?,
                changed = self.users_feed.changed() => changed?,
            }
        }
    }

    /// Compute the dashboard from the current snapshots and publish once.
    ///
    /// The reports snapshot drives the dashboard; the users collection only
    /// contributes counts, so it may lag behind without blocking readiness.
    fn refresh(&self) {
        let state = match (self.reports_feed.current(), self.users_feed.current()) {
            (SnapshotState::Failed(reason), _) | (_, SnapshotState::Failed(reason)) => {
                warn!(reason = %reason, "subscription failed, dashboard degraded");
                LoadState::Failed(reason)
            }
            (SnapshotState::Loading, _) => LoadState::Loading,
            (SnapshotState::Ready(reports), users) => {
                let empty: Vec<UserAccount> = Vec::new();
                let users_docs = match &users {
                    SnapshotState::Ready(snapshot) => snapshot.docs.as_slice(),
                    _ => &empty,
                };
                match dashboard::recompute(
                    &self.dashboard,
                    reports.docs.as_slice(),
                    users_docs,
                    Utc::now(),
                ) {
                    Ok(snapshot) => LoadState::Ready(snapshot),
                    Err(err) => LoadState::Failed(err.to_string()),
                }
            }
        };
        let _ = self.state_tx.send(state);
    }
}
