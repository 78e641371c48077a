//! WebSocket-backed document store.
//!
//! Speaks a small JSON frame protocol: the client sends `subscribe` and
//! `insert` frames; the server pushes a `snapshot` frame with the entire
//! collection on every mutation, and `error` frames on failure. A
//! background task owns the socket, resubscribes after reconnecting with
//! exponential backoff and jitter, and degrades both hubs to a failed
//! state once the consecutive-failure cap is reached.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::config::{ReconnectConfig, StoreConfig};
use crate::domain::{Report, ReportDraft, ReportId, UserAccount};
use crate::error::{ConfigError, Error, Result, StoreError};

use super::{DocumentStore, SnapshotFeed, SnapshotHub, REPORTS_COLLECTION, USERS_COLLECTION};

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ClientFrame {
    Subscribe {
        collection: String,
    },
    Insert {
        collection: String,
        doc: serde_json::Value,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    Snapshot {
        collection: String,
        docs: serde_json::Value,
    },
    Error {
        #[serde(default)]
        collection: Option<String>,
        message: String,
    },
}

/// A frame queued for the connection task, acknowledged once it has been
/// written to the socket.
struct Outbound {
    frame: ClientFrame,
    ack: oneshot::Sender<Result<()>>,
}

pub struct RemoteStore {
    reports_hub: SnapshotHub<Report>,
    users_hub: SnapshotHub<UserAccount>,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl RemoteStore {
    /// Connect to a remote store endpoint. The socket is owned by a spawned
    /// task; this returns immediately and snapshots arrive through the
    /// subscription feeds.
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        if config.ws_url.is_empty() {
            return Err(ConfigError::MissingField { field: "store.ws_url" }.into());
        }
        url::Url::parse(&config.ws_url)?;

        let reports_hub = SnapshotHub::new();
        let users_hub = SnapshotHub::new();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (detach_tx, detach_rx) = mpsc::unbounded_channel();

        let detach = detach_tx.clone();
        reports_hub.set_teardown(move || {
            let _ = detach.send(());
        });
        let detach = detach_tx;
        users_hub.set_teardown(move || {
            let _ = detach.send(());
        });

        let connection = Connection {
            url: config.ws_url.clone(),
            reconnect: config.reconnect.clone(),
            reports_hub: reports_hub.clone(),
            users_hub: users_hub.clone(),
            outbound_rx,
            detach_rx,
        };
        tokio::spawn(connection.run());

        Ok(Self {
            reports_hub,
            users_hub,
            outbound: outbound_tx,
        })
    }

    fn send(&self, outbound: Outbound) -> Result<()> {
        self.outbound
            .send(outbound)
            .map_err(|_| StoreError::Connect("store connection task stopped".to_string()).into())
    }
}

#[async_trait]
impl DocumentStore for RemoteStore {
    async fn subscribe_reports(&self) -> Result<SnapshotFeed<Report>> {
        Ok(self.reports_hub.attach())
    }

    async fn subscribe_users(&self) -> Result<SnapshotFeed<UserAccount>> {
        Ok(self.users_hub.attach())
    }

    /// Persist a report through the socket. Resolves only after the insert
    /// frame has been written to a connected session; fails instead of
    /// acknowledging a write the connection task gave up on.
    async fn insert_report(&self, draft: ReportDraft) -> Result<ReportId> {
        // The id is generated client-side, as document-store client SDKs
        // do; the server stamps the creation instant on persist.
        let id = ReportId::generate();
        let mut doc = serde_json::to_value(&draft)?;
        if let Some(map) = doc.as_object_mut() {
            map.insert("id".to_string(), serde_json::json!(id.0));
        }
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(Outbound {
            frame: ClientFrame::Insert {
                collection: REPORTS_COLLECTION.to_string(),
                doc,
            },
            ack: ack_tx,
        })?;
        ack_rx
            .await
            .map_err(|_| StoreError::Connect("store connection task stopped".to_string()))??;
        Ok(id)
    }
}

/// How one connected session ended.
enum SessionEnd {
    /// All consumers detached; stop entirely.
    Detached,
    /// Server closed or the socket errored; reconnect.
    Disconnected(Error),
}

struct Connection {
    url: String,
    reconnect: ReconnectConfig,
    reports_hub: SnapshotHub<Report>,
    users_hub: SnapshotHub<UserAccount>,
    outbound_rx: mpsc::UnboundedReceiver<Outbound>,
    detach_rx: mpsc::UnboundedReceiver<()>,
}

impl Connection {
    async fn run(mut self) {
        let mut consecutive_failures: u32 = 0;
        let mut delay_ms = self.reconnect.initial_delay_ms;

        loop {
            match self.session().await {
                Ok(SessionEnd::Detached) => {
                    info!("all subscribers detached, closing store connection");
                    self.fail_pending("store connection closed");
                    return;
                }
                Ok(SessionEnd::Disconnected(err)) => {
                    consecutive_failures += 1;
                    warn!(error = %err, failures = consecutive_failures, "store connection lost");
                }
                Err(err) => {
                    consecutive_failures += 1;
                    warn!(error = %err, failures = consecutive_failures, "store connection failed");
                }
            }

            if consecutive_failures >= self.reconnect.max_consecutive_failures {
                let reason = "failed to load: store connection lost".to_string();
                self.reports_hub.fail(reason.clone());
                self.users_hub.fail(reason.clone());
                self.fail_pending(&reason);
                return;
            }

            let delay = Duration::from_millis(delay_ms + jitter_ms(delay_ms));
            delay_ms = ((delay_ms as f64 * self.reconnect.backoff_multiplier) as u64)
                .min(self.reconnect.max_delay_ms);
            debug!(delay_ms = delay.as_millis() as u64, "reconnecting after backoff");
            sleep(delay).await;
        }
    }

    /// Fail every queued-but-unsent insert so no caller keeps waiting on an
    /// acknowledgment that can never arrive.
    fn fail_pending(&mut self, reason: &str) {
        self.outbound_rx.close();
        while let Ok(outbound) = self.outbound_rx.try_recv() {
            let _ = outbound
                .ack
                .send(Err(StoreError::Connect(reason.to_string()).into()));
        }
    }

    /// One connected session: subscribe, then pump frames until the socket
    /// drops or every consumer detaches.
    async fn session(&mut self) -> Result<SessionEnd> {
        let (ws, _) = connect_async(self.url.as_str()).await?;
        info!(url = %self.url, "connected to document store");
        let (mut sink, mut stream) = ws.split();

        for collection in [REPORTS_COLLECTION, USERS_COLLECTION] {
            let frame = ClientFrame::Subscribe {
                collection: collection.to_string(),
            };
            sink.send(Message::Text(serde_json::to_string(&frame)?))
                .await?;
        }

        let reports_hub = self.reports_hub.clone();
        let users_hub = self.users_hub.clone();

        loop {
            tokio::select! {
                _ = self.detach_rx.recv() => {
                    if reports_hub.subscriber_count() == 0
                        && users_hub.subscriber_count() == 0
                    {
                        let _ = sink.close().await;
                        return Ok(SessionEnd::Detached);
                    }
                }
                outbound = self.outbound_rx.recv() => {
                    match outbound {
                        Some(outbound) => {
                            let text = serde_json::to_string(&outbound.frame)?;
                            match sink.send(Message::Text(text)).await {
                                Ok(()) => {
                                    // Acknowledge only once the frame is on the wire.
                                    let _ = outbound.ack.send(Ok(()));
                                }
                                Err(err) => {
                                    let _ = outbound.ack.send(Err(StoreError::Connect(
                                        "write lost before reaching the store".to_string(),
                                    )
                                    .into()));
                                    return Ok(SessionEnd::Disconnected(err.into()));
                                }
                            }
                        }
                        None => {
                            let _ = sink.close().await;
                            return Ok(SessionEnd::Detached);
                        }
                    }
                }
                message = stream.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            handle_frame(&reports_hub, &users_hub, &text);
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            return Ok(SessionEnd::Disconnected(
                                StoreError::Connect("server closed connection".to_string()).into(),
                            ));
                        }
                        Some(Ok(_)) => {} // ping/pong/binary: nothing to do
                        Some(Err(err)) => return Ok(SessionEnd::Disconnected(err.into())),
                    }
                }
            }
        }
    }
}

fn handle_frame(
    reports_hub: &SnapshotHub<Report>,
    users_hub: &SnapshotHub<UserAccount>,
    text: &str,
) {
    let frame: ServerFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => {
            warn!(error = %err, "ignoring unparseable store frame");
            return;
        }
    };

    match frame {
        ServerFrame::Snapshot { collection, docs } => match collection.as_str() {
            REPORTS_COLLECTION => match serde_json::from_value::<Vec<Report>>(docs) {
                Ok(reports) => {
                    debug!(count = reports.len(), "reports snapshot received");
                    reports_hub.publish(reports);
                }
                Err(err) => warn!(error = %err, "ignoring malformed reports snapshot"),
            },
            USERS_COLLECTION => match serde_json::from_value::<Vec<UserAccount>>(docs) {
                Ok(users) => {
                    debug!(count = users.len(), "users snapshot received");
                    users_hub.publish(users);
                }
                Err(err) => warn!(error = %err, "ignoring malformed users snapshot"),
            },
            other => debug!(collection = other, "snapshot for unknown collection ignored"),
        },
        ServerFrame::Error {
            collection,
            message,
        } => match collection.as_deref() {
            Some(REPORTS_COLLECTION) => reports_hub.fail(message),
            Some(USERS_COLLECTION) => users_hub.fail(message),
            _ => {
                reports_hub.fail(message.clone());
                users_hub.fail(message);
            }
        },
    }
}

/// Deterministic-enough jitter without a PRNG dependency: up to 20% of the
/// base delay, derived from the clock's subsecond nanos.
fn jitter_ms(base_ms: u64) -> u64 {
    let range = base_ms / 5;
    if range == 0 {
        return 0;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos) % (range + 1)
}
