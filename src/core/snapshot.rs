//! Snapshot aggregation: a point-in-time heartbeat record for one manager.
//!
//! Building a record runs in two phases:
//!
//! 1. **Collect**: for each pool in order, take the pool guard, clone the
//!    in-progress messages, drop the guard. At most one guard is held at a time
//!    and nothing else happens while it is held.
//! 2. **Encode**: with no locks held, total up capacity and busy counts and
//!    serialize the wire documents.
//!
//! The result is best effort: a job may start or finish between two pools being
//! read, and the record does not try to hide that.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Serialize, Serializer};
use tracing::{error, trace};

use crate::util::clock::{unix_secs, unix_secs_f64};

use super::wire::{encode_info, encode_worker_message, namespace_tag, HeartbeatInfo};
use super::{InProgressMessage, Manager};

/// Copy of one pool's state taken under its lock.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSnapshot {
    /// Queue drained by the pool.
    pub queue: String,
    /// Configured concurrency.
    pub concurrency: usize,
    /// In-progress messages in runner order.
    pub in_progress: Vec<InProgressMessage>,
}

/// Heartbeat record handed to the publisher.
///
/// Built fresh every tick and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartbeatRecord {
    /// Key of the record in the external store.
    pub identity: String,
    /// When the record was built.
    #[serde(serialize_with = "serialize_beat")]
    pub beat: SystemTime,
    /// Whether the process stopped fetching new work.
    pub quiet: bool,
    /// Runners holding a job.
    pub busy: usize,
    /// Resident memory; not measured, always 0.
    pub rss: u64,
    /// Serialized [`HeartbeatInfo`]; `None` if it could not be serialized.
    pub info: Option<String>,
    /// OS process id.
    pub pid: u32,
    /// Serialized job wrapper per transaction id.
    pub worker_messages: BTreeMap<String, String>,
}

fn serialize_beat<S: Serializer>(beat: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(unix_secs_f64(*beat))
}

impl HeartbeatRecord {
    /// Beat time as fractional unix seconds.
    #[must_use]
    pub fn beat_unix_secs(&self) -> f64 {
        unix_secs_f64(self.beat)
    }
}

/// Read every pool of `manager`, one lock at a time.
#[must_use]
pub fn collect_pools(manager: &Manager) -> Vec<PoolSnapshot> {
    manager
        .pools()
        .iter()
        .map(|pool| PoolSnapshot {
            queue: pool.queue().to_string(),
            concurrency: pool.concurrency(),
            in_progress: pool.collect_in_progress(),
        })
        .collect()
}

/// Build the heartbeat record for `manager`.
///
/// Serialization failures never abort the build: a failed info document leaves
/// `info` as `None` and a failed job entry is left out of `worker_messages`. Both
/// are logged.
#[must_use]
pub fn build_snapshot(manager: &Manager) -> HeartbeatRecord {
    let beat = SystemTime::now();
    let enqueued_at = unix_secs(beat);
    let pools = collect_pools(manager);

    let mut queues = Vec::with_capacity(pools.len());
    let mut concurrency = 0;
    let mut busy = 0;
    let mut worker_messages = BTreeMap::new();

    for pool in &pools {
        queues.push(pool.queue.clone());
        concurrency += pool.concurrency;
        busy += pool.in_progress.len();

        for msg in &pool.in_progress {
            match encode_worker_message(&pool.queue, msg, enqueued_at) {
                Ok(encoded) => {
                    worker_messages.insert(msg.tid.clone(), encoded);
                }
                Err(e) => {
                    error!(queue = %pool.queue, tid = %msg.tid, error = %e, "failed to encode in-progress job, omitting it");
                }
            }
        }
    }

    let identity = manager.identity();
    let identity_str = identity.identity();
    let info = HeartbeatInfo {
        hostname: identity.display_hostname(),
        started_at: unix_secs(manager.started_at()),
        pid: identity.pid(),
        tag: namespace_tag(manager.options().namespace.as_deref()),
        concurrency,
        queues,
        labels: Vec::new(),
        identity: identity_str.clone(),
    };
    let info = match encode_info(&info) {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            error!(identity = %identity_str, error = %e, "failed to encode heartbeat info, omitting it");
            None
        }
    };

    trace!(identity = %identity_str, busy, concurrency, "heartbeat snapshot built");

    HeartbeatRecord {
        identity: identity_str,
        beat,
        quiet: false,
        busy,
        rss: 0,
        info,
        pid: identity.pid(),
        worker_messages,
    }
}
