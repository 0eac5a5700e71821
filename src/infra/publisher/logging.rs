//! Publisher that writes records to the tracing log.

use async_trait::async_trait;
use tracing::info;

use crate::core::{HeartbeatRecord, HeartbeatResult, Publisher};

/// Emits each record as a structured `info` event. Useful when no store is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn send(&self, record: HeartbeatRecord) -> HeartbeatResult<()> {
        let encoded = serde_json::to_string(&record)?;
        info!(
            identity = %record.identity,
            beat = record.beat_unix_secs(),
            busy = record.busy,
            in_flight = record.worker_messages.len(),
            record = %encoded,
            "heartbeat"
        );
        Ok(())
    }
}
