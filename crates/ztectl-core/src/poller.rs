// ── Background polling ──
//
// A single task owns the SessionClient, so refresh cycles can never
// overlap. Each finished cycle is published on a watch channel; consumers
// only ever see the latest snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ztectl_api::{SessionClient, Snapshot};

use crate::error::CoreError;

/// One completed refresh cycle.
#[derive(Debug, Clone, Serialize)]
pub struct PollUpdate {
    /// 1-based cycle counter.
    pub cycle: u64,
    pub fetched_at: DateTime<Utc>,
    /// `false` when every section came back empty, which in practice
    /// means the router could not be reached.
    pub reachable: bool,
    /// Whether the client held a live session after the cycle.
    pub authenticated: bool,
    pub snapshot: Arc<Snapshot>,
}

/// Spawns the polling task.
pub struct Poller;

impl Poller {
    /// Start polling: one refresh immediately, then one per `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(client: SessionClient, interval: Duration) -> Result<PollerHandle, CoreError> {
        if interval.is_zero() {
            return Err(CoreError::InvalidConfig {
                message: "poll interval must be greater than zero".into(),
            });
        }

        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_task(client, interval, tx, cancel.clone()));

        debug!(interval_secs = interval.as_secs_f64(), "poller started");
        Ok(PollerHandle { rx, cancel, task })
    }
}

/// Handle to a running poller.
pub struct PollerHandle {
    rx: watch::Receiver<Option<Arc<PollUpdate>>>,
    cancel: CancellationToken,
    task: JoinHandle<SessionClient>,
}

impl PollerHandle {
    /// Subscribe to updates. The current value is `None` until the first
    /// cycle completes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<PollUpdate>>> {
        self.rx.clone()
    }

    /// The most recent update, if any cycle has completed.
    pub fn latest(&self) -> Option<Arc<PollUpdate>> {
        self.rx.borrow().clone()
    }

    /// Stop polling and wait for the task to finish.
    ///
    /// An in-flight refresh is abandoned. Returns the client with its
    /// connection pool closed.
    pub async fn shutdown(self) -> Result<SessionClient, CoreError> {
        self.cancel.cancel();
        self.task.await.map_err(|e| CoreError::TaskFailed {
            message: e.to_string(),
        })
    }
}

async fn poll_task(
    mut client: SessionClient,
    interval: Duration,
    tx: watch::Sender<Option<Arc<PollUpdate>>>,
    cancel: CancellationToken,
) -> SessionClient {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut cycle = 0;
    let mut last_reachable = None;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let snapshot = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            snapshot = client.refresh() => Some(snapshot),
        };
        let Some(snapshot) = snapshot else { break };

        cycle += 1;
        let reachable = snapshot.has_data();
        if last_reachable != Some(reachable) {
            if reachable {
                info!(host = client.host(), "router reachable");
            } else {
                warn!(host = client.host(), "router returned no data, check connectivity");
            }
            last_reachable = Some(reachable);
        }

        tx.send_replace(Some(Arc::new(PollUpdate {
            cycle,
            fetched_at: Utc::now(),
            reachable,
            authenticated: client.is_authenticated(),
            snapshot: Arc::new(snapshot),
        })));
    }

    client.close();
    debug!(cycles = cycle, "poller stopped");
    client
}
