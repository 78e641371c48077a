//! Shared snapshot fan-out with subscriber counting.
//!
//! One upstream subscription feeds a hub; any number of [`SnapshotFeed`]s
//! observe it through a watch channel. When the last feed drops, the hub
//! runs its teardown hook exactly once and every later publish is dropped,
//! so no pending callback can mutate consumer-visible state after
//! unsubscription.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::error::{Result, StoreError};

use super::{Snapshot, SnapshotState};

type TeardownHook = Box<dyn FnOnce() + Send>;

struct Shared<T> {
    tx: watch::Sender<SnapshotState<T>>,
    subscribers: Mutex<usize>,
    torn_down: AtomicBool,
    teardown: Mutex<Option<TeardownHook>>,
    seq: AtomicU64,
}

/// Fan-out point for one collection's snapshot stream.
pub struct SnapshotHub<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for SnapshotHub<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for SnapshotHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotHub<T> {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SnapshotState::Loading);
        Self {
            shared: Arc::new(Shared {
                tx,
                subscribers: Mutex::new(0),
                torn_down: AtomicBool::new(false),
                teardown: Mutex::new(None),
                seq: AtomicU64::new(0),
            }),
        }
    }

    /// Install the hook run when the last subscriber detaches. Used by the
    /// upstream owner to release its watch resources.
    pub fn set_teardown(&self, hook: impl FnOnce() + Send + 'static) {
        *self.shared.teardown.lock() = Some(Box::new(hook));
    }

    /// Replace the working set with a new full snapshot.
    ///
    /// Dropped silently once the hub is torn down.
    pub fn publish(&self, docs: Vec<T>) {
        if self.is_torn_down() {
            debug!("dropping snapshot published after teardown");
            return;
        }
        let seq = self.shared.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let snapshot = Snapshot {
            docs: Arc::new(docs),
            seq,
        };
        // send_replace stores the state even with no receivers attached yet,
        // so a later attach still observes the latest snapshot.
        self.shared.tx.send_replace(SnapshotState::Ready(snapshot));
    }

    /// Degrade the subscription. Consumers stop treating prior snapshots as
    /// current.
    pub fn fail(&self, reason: impl Into<String>) {
        if self.is_torn_down() {
            return;
        }
        self.shared.tx.send_replace(SnapshotState::Failed(reason.into()));
    }

    /// Attach a new consumer.
    pub fn attach(&self) -> SnapshotFeed<T> {
        *self.shared.subscribers.lock() += 1;
        SnapshotFeed {
            rx: self.shared.tx.subscribe(),
            shared: Arc::clone(&self.shared),
        }
    }

    /// The latest published state, without attaching.
    pub fn current(&self) -> SnapshotState<T>
    where
        T: Clone,
    {
        self.shared.tx.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        *self.shared.subscribers.lock()
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.torn_down.load(Ordering::SeqCst)
    }
}

/// One consumer's view of a hub. Dropping the last feed tears the hub down
/// synchronously.
pub struct SnapshotFeed<T> {
    rx: watch::Receiver<SnapshotState<T>>,
    shared: Arc<Shared<T>>,
}

impl<T: Clone> SnapshotFeed<T> {
    /// The latest known state.
    pub fn current(&self) -> SnapshotState<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change.
    ///
    /// Returns [`StoreError::SubscriptionClosed`] when the hub side is gone.
    pub async fn changed(&mut self) -> Result<()> {
        self.rx
            .changed()
            .await
            .map_err(|_| StoreError::SubscriptionClosed.into())
    }
}

impl<T> Drop for SnapshotFeed<T> {
    fn drop(&mut self) {
        let mut subscribers = self.shared.subscribers.lock();
        *subscribers = subscribers.saturating_sub(1);
        if *subscribers > 0 {
            return;
        }
        drop(subscribers);

        if self.shared.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("last subscriber detached, tearing down hub");
        if let Some(hook) = self.shared.teardown.lock().take() {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn attach_sees_latest_snapshot_immediately() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        hub.publish(vec![1, 2, 3]);

        let feed = hub.attach();
        match feed.current() {
            SnapshotState::Ready(snapshot) => {
                assert_eq!(*snapshot.docs, vec![1, 2, 3]);
                assert_eq!(snapshot.seq, 1);
            }
            other => panic!("expected ready state, got {other:?}"),
        }
    }

    #[test]
    fn last_detach_runs_teardown_once_and_blocks_publishes() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let teardowns = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&teardowns);
        hub.set_teardown(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let first = hub.attach();
        let second = hub.attach();
        assert_eq!(hub.subscriber_count(), 2);

        drop(first);
        assert_eq!(teardowns.load(Ordering::SeqCst), 0);

        drop(second);
        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
        assert!(hub.is_torn_down());

        // A late callback must not mutate anything.
        hub.publish(vec![9]);
        let feed = hub.attach();
        assert!(matches!(feed.current(), SnapshotState::Loading));
    }

    #[tokio::test]
    async fn changed_wakes_on_publish_and_failure() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let mut feed = hub.attach();

        hub.publish(vec![7]);
        feed.changed().await.expect("publish wakes the feed");
        assert!(matches!(feed.current(), SnapshotState::Ready(_)));

        hub.fail("connection lost");
        feed.changed().await.expect("failure wakes the feed");
        match feed.current() {
            SnapshotState::Failed(reason) => assert_eq!(reason, "connection lost"),
            other => panic!("expected failed state, got {other:?}"),
        }
    }
}
