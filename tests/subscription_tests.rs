//! Fan-out, teardown, and degradation behavior of the subscription layer.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vigia::app::App;
use vigia::config::Config;
use vigia::dashboard::LoadState;
use vigia::domain::Report;
use vigia::store::{DocumentStore, SnapshotHub, SnapshotState};
use vigia::testkit::report::report_at;
use vigia::testkit::store::ScriptedStore;

fn default_config() -> Config {
    toml::from_str("").expect("default config")
}

#[tokio::test]
async fn one_upstream_snapshot_reaches_every_consumer() {
    let hub: SnapshotHub<Report> = SnapshotHub::new();
    let mut first = hub.attach();
    let mut second = hub.attach();

    hub.publish(vec![report_at(chrono::Utc::now())]);

    first.changed().await.expect("first consumer woken");
    second.changed().await.expect("second consumer woken");

    for feed in [&first, &second] {
        match feed.current() {
            SnapshotState::Ready(snapshot) => assert_eq!(snapshot.len(), 1),
            other => panic!("expected ready state, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn snapshots_replace_the_working_set_wholesale() {
    let hub: SnapshotHub<Report> = SnapshotHub::new();
    let mut feed = hub.attach();

    hub.publish(vec![report_at(chrono::Utc::now()); 3]);
    feed.changed().await.expect("first snapshot");

    // A shrinking snapshot fully replaces the previous one; nothing merges.
    hub.publish(vec![report_at(chrono::Utc::now())]);
    feed.changed().await.expect("second snapshot");

    match feed.current() {
        SnapshotState::Ready(snapshot) => {
            assert_eq!(snapshot.len(), 1);
            assert_eq!(snapshot.seq, 2);
        }
        other => panic!("expected ready state, got {other:?}"),
    }
}

#[test]
fn teardown_runs_once_when_the_last_consumer_detaches() {
    let hub: SnapshotHub<Report> = SnapshotHub::new();
    let teardowns = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&teardowns);
    hub.set_teardown(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let a = hub.attach();
    let b = hub.attach();
    drop(a);
    assert_eq!(teardowns.load(Ordering::SeqCst), 0);
    drop(b);
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);

    // A snapshot arriving after teardown is dropped, not delivered.
    hub.publish(vec![report_at(chrono::Utc::now())]);
    assert!(matches!(hub.current(), SnapshotState::Loading));
}

#[tokio::test]
async fn interleaved_collections_update_independently() {
    let store = ScriptedStore::new();
    let config = default_config();
    let (app, mut state_rx) = App::start(&config, &store).await.expect("start");
    let worker = tokio::spawn(app.run());

    // Users arrive before reports; the dashboard must keep loading.
    store.users.publish(vec![]);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(matches!(*state_rx.borrow(), LoadState::Loading));

    store.reports.publish(vec![report_at(chrono::Utc::now())]);
    loop {
        state_rx.changed().await.expect("state update");
        if let LoadState::Ready(snapshot) = state_rx.borrow_and_update().clone() {
            assert_eq!(snapshot.total_reports, 1);
            break;
        }
    }

    worker.abort();
}

#[tokio::test]
async fn failure_on_either_subscription_degrades_the_dashboard() {
    let store = ScriptedStore::new();
    let config = default_config();
    let (app, mut state_rx) = App::start(&config, &store).await.expect("start");
    let worker = tokio::spawn(app.run());

    store.reports.publish(vec![report_at(chrono::Utc::now())]);
    store.users.fail("permission denied");

    loop {
        state_rx.changed().await.expect("state update");
        if let LoadState::Failed(reason) = state_rx.borrow_and_update().clone() {
            assert_eq!(reason, "permission denied");
            break;
        }
    }

    worker.abort();
}

#[tokio::test]
async fn write_path_triggers_a_fresh_snapshot() {
    let store = ScriptedStore::new();
    let mut feed = store.subscribe_reports().await.expect("subscribe");

    store
        .insert_report(vigia::domain::ReportDraft {
            description: "broken streetlight".to_string(),
            tags: vec!["Alumbrado".to_string()],
            neighborhood: None,
        })
        .await
        .expect("insert");

    feed.changed().await.expect("snapshot delivered");
    match feed.current() {
        SnapshotState::Ready(snapshot) => {
            assert_eq!(snapshot.len(), 1);
            assert!(snapshot.docs[0].created_at.is_some());
        }
        other => panic!("expected ready state, got {other:?}"),
    }
    assert_eq!(store.inserted().len(), 1);
}
