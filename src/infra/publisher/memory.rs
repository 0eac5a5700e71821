//! In-memory publisher backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{HeartbeatError, HeartbeatRecord, HeartbeatResult, Publisher};

/// Publisher that keeps the latest record per identity, for development and testing.
///
/// Mirrors the store's overwrite semantics: a second send for an identity
/// replaces the first.
#[derive(Debug, Default)]
pub struct InMemoryPublisher {
    records: Mutex<HashMap<String, HeartbeatRecord>>,
    order: Mutex<Vec<String>>,
    sent: AtomicU64,
    fail_next: AtomicUsize,
}

impl InMemoryPublisher {
    /// Create an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` sends fail with `HeartbeatError::Publish`.
    pub fn fail_next(&self, count: usize) {
        self.fail_next.store(count, Ordering::Release);
    }

    /// Latest record stored for `identity`.
    #[must_use]
    pub fn get(&self, identity: &str) -> Option<HeartbeatRecord> {
        self.records.lock().get(identity).cloned()
    }

    /// Number of distinct identities stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Successful sends so far.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Acquire)
    }

    /// Identities in the order their records were accepted, one entry per send.
    #[must_use]
    pub fn send_order(&self) -> Vec<String> {
        self.order.lock().clone()
    }

    fn take_failure(&self) -> bool {
        self.fail_next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Publisher for InMemoryPublisher {
    async fn send(&self, record: HeartbeatRecord) -> HeartbeatResult<()> {
        if self.take_failure() {
            return Err(HeartbeatError::Publish(format!(
                "injected failure for {}",
                record.identity
            )));
        }
        self.order.lock().push(record.identity.clone());
        self.records.lock().insert(record.identity.clone(), record);
        self.sent.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::time::SystemTime;

    fn record(identity: &str, busy: usize) -> HeartbeatRecord {
        HeartbeatRecord {
            identity: identity.into(),
            beat: SystemTime::now(),
            quiet: false,
            busy,
            rss: 0,
            info: None,
            pid: 1,
            worker_messages: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_overwrites_by_identity() {
        let publisher = InMemoryPublisher::new();
        publisher.send(record("a", 1)).await.unwrap();
        publisher.send(record("a", 2)).await.unwrap();
        publisher.send(record("b", 0)).await.unwrap();

        assert_eq!(publisher.len(), 2);
        assert_eq!(publisher.get("a").unwrap().busy, 2);
        assert_eq!(publisher.sent(), 3);
        assert_eq!(publisher.send_order(), vec!["a", "a", "b"]);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let publisher = InMemoryPublisher::new();
        publisher.fail_next(1);

        let err = publisher.send(record("a", 0)).await.unwrap_err();
        assert!(matches!(err, HeartbeatError::Publish(_)));
        assert!(publisher.is_empty());

        publisher.send(record("a", 0)).await.unwrap();
        assert_eq!(publisher.sent(), 1);
    }
}
