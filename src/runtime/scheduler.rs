//! Periodic heartbeat driver.
//!
//! One tokio task drives every registered manager. Each tick walks the managers
//! in registration order and, for each one, builds a snapshot and awaits the
//! publisher before moving on. Nothing runs in parallel: a slow publish delays
//! the remaining managers and the next tick, and never overlaps with another
//! publish.
//!
//! # Design
//!
//! - **Explicit task**: [`HeartbeatScheduler::start`] returns a handle; dropping
//!   the handle or calling [`HeartbeatHandle::stop`] ends the loop
//! - **Best effort**: publish errors are logged and counted, and the next tick
//!   retries with a fresh snapshot
//! - **No timeout** on the publish call; a hung store stalls later ticks

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::HeartbeatConfig;
use crate::core::{build_snapshot, Manager, Publisher};

/// Interval between ticks unless configured otherwise.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Records the publisher accepted.
    pub published: usize,
    /// Records the publisher rejected.
    pub failed: usize,
}

/// Cumulative scheduler statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Ticks completed.
    pub ticks: u64,
    /// Records published.
    pub published: u64,
    /// Publish failures.
    pub failed: u64,
}

#[derive(Debug, Default)]
struct SchedulerCounters {
    ticks: AtomicU64,
    published: AtomicU64,
    failed: AtomicU64,
}

impl SchedulerCounters {
    fn record(&self, report: TickReport) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.published
            .fetch_add(report.published as u64, Ordering::Relaxed);
        self.failed.fetch_add(report.failed as u64, Ordering::Relaxed);
    }

    fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Drives snapshot-and-publish cycles for all registered managers.
pub struct HeartbeatScheduler {
    publisher: Arc<dyn Publisher>,
    interval: Duration,
    managers: RwLock<Vec<Arc<Manager>>>,
    counters: SchedulerCounters,
}

impl HeartbeatScheduler {
    /// Create a scheduler with the given publisher and tick interval.
    ///
    /// A zero interval is raised to one millisecond.
    #[must_use]
    pub fn new(publisher: Arc<dyn Publisher>, interval: Duration) -> Self {
        Self {
            publisher,
            interval: interval.max(MIN_INTERVAL),
            managers: RwLock::new(Vec::new()),
            counters: SchedulerCounters::default(),
        }
    }

    /// Create a scheduler using the configured interval.
    #[must_use]
    pub fn from_config(config: &HeartbeatConfig, publisher: Arc<dyn Publisher>) -> Self {
        Self::new(publisher, Duration::from_secs(config.interval_secs))
    }

    /// Add a manager; ticks visit managers in registration order.
    pub fn register(&self, manager: Arc<Manager>) {
        debug!(identity = %manager.identity().identity(), "manager registered for heartbeats");
        self.managers.write().push(manager);
    }

    /// Number of registered managers.
    #[must_use]
    pub fn manager_count(&self) -> usize {
        self.managers.read().len()
    }

    /// Tick interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Cumulative statistics.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.counters.snapshot()
    }

    /// Run one tick: snapshot and publish every manager, one after another.
    pub async fn beat_once(&self) -> TickReport {
        let managers = self.managers.read().clone();
        let mut report = TickReport::default();

        for manager in managers {
            let record = build_snapshot(&manager);
            let identity = record.identity.clone();
            let busy = record.busy;

            match self.publisher.send(record).await {
                Ok(()) => {
                    debug!(identity = %identity, busy, "heartbeat published");
                    report.published += 1;
                }
                Err(e) => {
                    error!(identity = %identity, error = %e, "heartbeat publish failed");
                    report.failed += 1;
                }
            }
        }

        self.counters.record(report);
        report
    }

    /// Spawn the periodic task on the current tokio runtime.
    ///
    /// The first tick fires immediately. If a tick overruns the interval, the
    /// next one is pushed back rather than fired in a burst.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use = "dropping the handle stops the heartbeat task"]
    pub fn start(self: Arc<Self>) -> HeartbeatHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
                managers = self.manager_count(),
                "heartbeat scheduler started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        info!("heartbeat scheduler shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let report = self.beat_once().await;
                        if report.failed > 0 {
                            warn!(failed = report.failed, published = report.published, "heartbeat tick had failures");
                        }
                    }
                }
            }
        });

        HeartbeatHandle {
            shutdown: shutdown_tx,
            join,
        }
    }
}

/// Handle to a running heartbeat task.
///
/// Dropping the handle closes the shutdown channel, which stops the task after
/// any tick in progress.
pub struct HeartbeatHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl HeartbeatHandle {
    /// Signal shutdown and wait for the task to exit.
    ///
    /// A tick already in progress finishes first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            warn!(error = %e, "heartbeat task ended abnormally");
        }
    }

    /// Whether the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
