use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

use stint_api::domain::{NewManualEntry, TimeTrackingEntry, TimeTrackingSummary};

use crate::{
    provider::{ProviderError, TimeTrackingProvider},
    reconcile::{ClockState, EngineState},
    TimerSnapshot,
};

/// Scheduling knobs, injectable so tests can drive the engine on tokio's
/// paused clock.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Fixed period of the summary poll.
    pub poll_interval: Duration,
    /// Period of the local clock while a timer is running.
    pub tick_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            tick_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum EngineMessage {
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FetchKind {
    /// Scheduled poll: summary only.
    Summary,
    /// First subscription and post-mutation refresh: summary plus entries.
    Both,
}

/// Result of one spawned fetch, tagged with its sequence number so a late
/// response can never overwrite a newer one.
struct FetchOutcome {
    seq: u64,
    summary: Result<TimeTrackingSummary, ProviderError>,
    entries: Option<Result<Vec<TimeTrackingEntry>, ProviderError>>,
}

/// Errors surfaced to callers of the mutation actions. Transient poll
/// failures never show up here; they degrade silently to a stale display.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("mutation rejected: {0}")]
    Rejected(String),
}

impl From<ProviderError> for MutationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unauthorized => MutationError::Unauthorized,
            ProviderError::Request(msg) | ProviderError::Malformed(msg) => {
                MutationError::Rejected(msg)
            }
        }
    }
}

/// The reconciliation engine for one task's timer.
///
/// Runs as a single actor task: a fixed-period summary poll, a
/// once-per-second local clock while the cached summary says a timer is
/// running, and a command channel for forced refreshes. Fetches run as
/// spawned subtasks so a slow response never blocks ticking; their
/// outcomes come back sequence-tagged and last-response-wins.
pub struct TimerEngine {
    provider: Arc<dyn TimeTrackingProvider>,
    config: EngineConfig,
    state: EngineState,
    snapshot_tx: watch::Sender<TimerSnapshot>,
    fetch_tx: mpsc::Sender<FetchOutcome>,
    next_seq: u64,
}

impl TimerEngine {
    /// Spawn one engine instance for one task's provider.
    ///
    /// The returned handle is the whole public surface. When every handle
    /// is dropped the actor stops on its own, same as `shutdown`.
    pub fn spawn(provider: Arc<dyn TimeTrackingProvider>, config: EngineConfig) -> EngineHandle {
        let (msg_tx, msg_rx) = mpsc::channel(16);
        let (fetch_tx, fetch_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::default());

        let engine = TimerEngine {
            provider: Arc::clone(&provider),
            config,
            state: EngineState::new(),
            snapshot_tx,
            fetch_tx,
            next_seq: 0,
        };
        tokio::spawn(engine.run(msg_rx, fetch_rx, shutdown_rx));

        EngineHandle {
            provider,
            msg_tx,
            shutdown_tx,
            snapshot_rx,
        }
    }

    #[instrument(name = "TimerEngine::run", skip_all)]
    async fn run(
        mut self,
        mut messages: mpsc::Receiver<EngineMessage>,
        mut fetches: mpsc::Receiver<FetchOutcome>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        // Hydrate immediately; scheduled polls start one period later.
        self.spawn_fetch(FetchKind::Both);
        let mut poll = tokio::time::interval_at(
            tokio::time::Instant::now() + self.config.poll_interval,
            self.config.poll_interval,
        );
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut ticker: Option<tokio::time::Interval> = None;

        loop {
            tokio::select! {
                // Latched signal; completes on shutdown or once every
                // handle is gone.
                _ = shutdown.changed() => break,
                msg = messages.recv() => match msg {
                    Some(EngineMessage::Refresh) => {
                        debug!("forced refresh");
                        self.spawn_fetch(FetchKind::Both);
                    }
                    None => break,
                },
                _ = poll.tick() => {
                    self.spawn_fetch(FetchKind::Summary);
                }
                _ = tick_or_sleep(&mut ticker) => {
                    self.state.tick();
                    self.publish();
                }
                Some(outcome) = fetches.recv() => {
                    self.apply(outcome, &mut ticker);
                }
            }
        }
        debug!("engine stopped");
    }

    fn spawn_fetch(&mut self, kind: FetchKind) {
        self.next_seq += 1;
        let seq = self.next_seq;
        let provider = Arc::clone(&self.provider);
        let results = self.fetch_tx.clone();

        tokio::spawn(async move {
            let summary = provider.fetch_summary().await;
            let entries = match kind {
                FetchKind::Summary => None,
                FetchKind::Both => Some(provider.fetch_entries().await),
            };
            // The engine may already be gone; nothing to deliver then.
            let _ = results.send(FetchOutcome { seq, summary, entries }).await;
        });
    }

    fn apply(&mut self, outcome: FetchOutcome, ticker: &mut Option<tokio::time::Interval>) {
        let applied = self.state.apply_summary(outcome.seq, outcome.summary);
        if let Some(entries) = outcome.entries {
            self.state.apply_entries(outcome.seq, entries);
        }

        if applied {
            match self.state.clock() {
                // A reseed means zero seconds since the authoritative
                // value, so the tick phase restarts too.
                ClockState::Ticking => {
                    let tick = self.config.tick_interval;
                    *ticker = Some(tokio::time::interval_at(
                        tokio::time::Instant::now() + tick,
                        tick,
                    ));
                }
                ClockState::Idle => *ticker = None,
            }
        }
        self.publish();
    }

    fn publish(&self) {
        let next = self.state.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
    }
}

async fn tick_or_sleep(ticker: &mut Option<tokio::time::Interval>) {
    if let Some(interval) = ticker {
        interval.tick().await;
    } else {
        // Sleep for a very long time to mimic a pending future.
        tokio::time::sleep(Duration::from_secs(86400)).await;
    }
}

/// Handle to a running [`TimerEngine`]: the snapshot subscription plus the
/// three mutation actions. Cloneable and cheap.
#[derive(Clone)]
pub struct EngineHandle {
    provider: Arc<dyn TimeTrackingProvider>,
    msg_tx: mpsc::Sender<EngineMessage>,
    shutdown_tx: watch::Sender<bool>,
    snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl EngineHandle {
    /// Current snapshot plus change notifications.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_rx.clone()
    }

    /// The snapshot as of now.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Ask the store to open a running entry for this task.
    ///
    /// The store enforces the single-running-timer invariant; a rejection
    /// is surfaced here, and either way a refresh is forced so the display
    /// converges on the store's verdict within one round trip.
    pub async fn start(&self) -> Result<(), MutationError> {
        let result = self.provider.start_timer().await;
        self.force_refresh().await;
        result.map_err(MutationError::from)
    }

    /// Close the running entry. No-op against an already-stopped timer.
    pub async fn stop(&self) -> Result<(), MutationError> {
        let result = self.provider.stop_timer().await;
        self.force_refresh().await;
        result.map_err(MutationError::from)
    }

    /// Create a closed entry with a caller-supplied duration. Values pass
    /// through unclamped; the store validates them.
    pub async fn add_manual_entry(
        &self,
        hours: u32,
        minutes: u32,
        description: Option<String>,
    ) -> Result<(), MutationError> {
        let entry = NewManualEntry::new(hours, minutes, description);
        let result = self.provider.add_manual_entry(&entry).await;
        self.force_refresh().await;
        result.map_err(MutationError::from)
    }

    /// Stop polling and ticking. The signal is latched, so it takes
    /// effect however many commands are queued. Safe to call repeatedly;
    /// never panics.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    async fn force_refresh(&self) {
        // An already-stopped engine has no cache left to invalidate.
        let _ = self.msg_tx.send(EngineMessage::Refresh).await;
    }
}
