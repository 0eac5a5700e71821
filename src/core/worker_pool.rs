//! Worker pools and runner slots as seen by heartbeat reporting.
//!
//! A `WorkerPool` drains one named queue through `concurrency` runners. The job
//! execution path claims and releases runner slots with [`WorkerPool::start_job`]
//! and [`WorkerPool::finish_job`]; heartbeat reporting only reads them through
//! [`WorkerPool::collect_in_progress`].
//!
//! # Locking
//!
//! - One `parking_lot::Mutex` per pool guards the runner list
//! - Readers clone what they need and drop the guard before doing anything else
//! - No method ever holds two pools' guards

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::config::WorkerPoolConfig;
use crate::util::clock::now_unix_secs;

use super::{HeartbeatError, HeartbeatResult};

/// Record of a job currently being executed by a runner.
#[derive(Debug, Clone, PartialEq)]
pub struct InProgressMessage {
    /// Job class name.
    pub class: String,
    /// Job id.
    pub jid: String,
    /// Job arguments; `None` when the job carried none.
    pub args: Option<Vec<Value>>,
    /// Unix seconds at which the runner picked the job up.
    pub started_at: i64,
    /// Id of this execution attempt, distinct from the job id.
    pub tid: String,
}

impl InProgressMessage {
    /// Create a message for a job picked up now, with a fresh transaction id.
    pub fn new(class: impl Into<String>, jid: impl Into<String>, args: Option<Vec<Value>>) -> Self {
        Self {
            class: class.into(),
            jid: jid.into(),
            args,
            started_at: now_unix_secs(),
            tid: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    /// Override the start timestamp.
    #[must_use]
    pub fn with_started_at(mut self, started_at: i64) -> Self {
        self.started_at = started_at;
        self
    }

    /// Override the transaction id.
    #[must_use]
    pub fn with_tid(mut self, tid: impl Into<String>) -> Self {
        self.tid = tid.into();
        self
    }
}

/// One execution slot within a pool.
#[derive(Debug)]
pub struct Runner {
    slot: usize,
    message: Option<InProgressMessage>,
}

impl Runner {
    const fn idle(slot: usize) -> Self {
        Self {
            slot,
            message: None,
        }
    }

    /// Slot index within the owning pool.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }

    /// The job this runner is executing, if any.
    #[must_use]
    pub const fn in_progress_message(&self) -> Option<&InProgressMessage> {
        self.message.as_ref()
    }
}

/// A fixed-concurrency group of runners draining one named queue.
#[derive(Debug)]
pub struct WorkerPool {
    queue: String,
    concurrency: usize,
    runners: Mutex<Vec<Runner>>,
}

impl WorkerPool {
    /// Create a pool with `concurrency` idle runners.
    pub fn new(queue: impl Into<String>, concurrency: usize) -> Self {
        Self {
            queue: queue.into(),
            concurrency,
            runners: Mutex::new((0..concurrency).map(Runner::idle).collect()),
        }
    }

    /// Create a pool from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `HeartbeatError::InvalidConfig` if the configuration is invalid.
    pub fn from_config(config: &WorkerPoolConfig) -> HeartbeatResult<Self> {
        config.validate().map_err(HeartbeatError::InvalidConfig)?;
        Ok(Self::new(config.queue.clone(), config.concurrency))
    }

    /// Queue drained by this pool.
    #[must_use]
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Configured slot count, independent of how many slots are busy.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Record that the runner at `slot` picked up `message`.
    ///
    /// Returns the message the slot held before, which is `None` unless the
    /// execution path failed to call [`finish_job`](Self::finish_job).
    ///
    /// # Errors
    ///
    /// Returns `HeartbeatError::InvalidSlot` if `slot >= concurrency`.
    pub fn start_job(
        &self,
        slot: usize,
        message: InProgressMessage,
    ) -> HeartbeatResult<Option<InProgressMessage>> {
        let mut runners = self.runners.lock();
        let runner = runners.get_mut(slot).ok_or(HeartbeatError::InvalidSlot {
            slot,
            concurrency: self.concurrency,
        })?;
        debug!(queue = %self.queue, slot, tid = %message.tid, "runner started job");
        Ok(runner.message.replace(message))
    }

    /// Clear the runner at `slot`, returning the job it held.
    ///
    /// # Errors
    ///
    /// Returns `HeartbeatError::InvalidSlot` if `slot >= concurrency`.
    pub fn finish_job(&self, slot: usize) -> HeartbeatResult<Option<InProgressMessage>> {
        let mut runners = self.runners.lock();
        let runner = runners.get_mut(slot).ok_or(HeartbeatError::InvalidSlot {
            slot,
            concurrency: self.concurrency,
        })?;
        Ok(runner.message.take())
    }

    /// Number of runners currently holding a job.
    #[must_use]
    pub fn busy(&self) -> usize {
        self.runners
            .lock()
            .iter()
            .filter(|r| r.in_progress_message().is_some())
            .count()
    }

    /// Copy every in-progress message out of the pool, in runner order.
    ///
    /// The pool guard is held only for the copy.
    #[must_use]
    pub fn collect_in_progress(&self) -> Vec<InProgressMessage> {
        let runners = self.runners.lock();
        runners
            .iter()
            .filter_map(Runner::in_progress_message)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_pool_is_idle() {
        let pool = WorkerPool::new("default", 3);
        assert_eq!(pool.queue(), "default");
        assert_eq!(pool.concurrency(), 3);
        assert_eq!(pool.busy(), 0);
        assert!(pool.collect_in_progress().is_empty());
    }

    #[test]
    fn test_start_and_finish_job() {
        let pool = WorkerPool::new("mail", 2);
        let msg = InProgressMessage::new("Send", "abc", Some(vec![json!(1)])).with_tid("t1");

        assert_eq!(pool.start_job(1, msg.clone()).unwrap(), None);
        assert_eq!(pool.busy(), 1);
        assert_eq!(pool.collect_in_progress(), vec![msg.clone()]);

        assert_eq!(pool.finish_job(1).unwrap(), Some(msg));
        assert_eq!(pool.busy(), 0);
    }

    #[test]
    fn test_slot_out_of_range() {
        let pool = WorkerPool::new("mail", 2);
        let err = pool
            .start_job(2, InProgressMessage::new("Send", "abc", None))
            .unwrap_err();
        assert!(matches!(err, HeartbeatError::InvalidSlot { slot: 2, concurrency: 2 }));
        assert!(pool.finish_job(5).is_err());
    }

    #[test]
    fn test_collect_preserves_runner_order() {
        let pool = WorkerPool::new("q", 4);
        pool.start_job(3, InProgressMessage::new("C", "3", None).with_tid("t3")).unwrap();
        pool.start_job(0, InProgressMessage::new("A", "0", None).with_tid("t0")).unwrap();

        let tids: Vec<_> = pool.collect_in_progress().into_iter().map(|m| m.tid).collect();
        assert_eq!(tids, vec!["t0", "t3"]);
    }

    #[test]
    fn test_new_message_has_unique_tid() {
        let a = InProgressMessage::new("A", "1", None);
        let b = InProgressMessage::new("A", "1", None);
        assert_ne!(a.tid, b.tid);
        assert!(a.started_at > 0);
    }
}
