//! Delivery of heartbeat records to the external store.

use async_trait::async_trait;

use super::{HeartbeatRecord, HeartbeatResult};

/// Abstraction for the store client that receives heartbeat records.
///
/// The store keys records by [`HeartbeatRecord::identity`]; sending again for the
/// same identity refreshes the entry. Expiring identities of dead processes is
/// the store's job.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_heartbeat::core::{HeartbeatRecord, HeartbeatResult, Publisher};
///
/// struct RedisPublisher { /* client */ }
///
/// #[async_trait]
/// impl Publisher for RedisPublisher {
///     async fn send(&self, record: HeartbeatRecord) -> HeartbeatResult<()> {
///         // HSET <identity> info/busy/beat/quiet/rss, then the per-tid work hash
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Publisher: Send + Sync + 'static {
    /// Deliver one record.
    ///
    /// # Errors
    ///
    /// Returns `HeartbeatError::Publish` (or any other variant) when delivery
    /// fails. The scheduler logs the error and waits for the next tick.
    async fn send(&self, record: HeartbeatRecord) -> HeartbeatResult<()>;
}
