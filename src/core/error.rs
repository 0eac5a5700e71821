//! Error types for heartbeat reporting.

use thiserror::Error;

/// Errors produced by heartbeat components.
#[derive(Debug, Error)]
pub enum HeartbeatError {
    /// The OS random source could not supply bytes for the process nonce.
    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),
    /// A wire document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The publisher failed to deliver a record.
    #[error("publish failed: {0}")]
    Publish(String),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A runner slot outside the pool's concurrency was addressed.
    #[error("runner slot {slot} out of range for concurrency {concurrency}")]
    InvalidSlot {
        /// Slot that was requested.
        slot: usize,
        /// Configured concurrency of the pool.
        concurrency: usize,
    },
}

/// Result alias for heartbeat operations.
pub type HeartbeatResult<T> = Result<T, HeartbeatError>;

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
