//! Process-level owner of worker pools.

use std::sync::Arc;
use std::time::SystemTime;

use tracing::info;

use crate::config::{HeartbeatConfig, ManagerOptions};

use super::{HeartbeatError, HeartbeatResult, ProcessIdentity, WorkerPool};

/// Owner of a fixed set of worker pools.
///
/// The pool list does not change after construction, so the snapshot
/// aggregator can walk it without synchronization.
#[derive(Debug)]
pub struct Manager {
    identity: ProcessIdentity,
    options: ManagerOptions,
    pools: Vec<Arc<WorkerPool>>,
    started_at: SystemTime,
}

impl Manager {
    /// Create a manager started now.
    ///
    /// The manager keeps its own view of `identity` carrying the configured
    /// display name.
    #[must_use]
    pub fn new(
        identity: &ProcessIdentity,
        options: ManagerOptions,
        pools: Vec<Arc<WorkerPool>>,
    ) -> Self {
        Self {
            identity: identity.with_display_name(options.display_name.as_deref()),
            options,
            pools,
            started_at: SystemTime::now(),
        }
    }

    /// Create a manager and its pools from configuration.
    ///
    /// # Errors
    ///
    /// Returns `HeartbeatError::InvalidConfig` if the configuration is invalid.
    pub fn from_config(identity: &ProcessIdentity, config: &HeartbeatConfig) -> HeartbeatResult<Self> {
        config.validate().map_err(HeartbeatError::InvalidConfig)?;
        let pools = config
            .pools
            .iter()
            .map(|pool| WorkerPool::from_config(pool).map(Arc::new))
            .collect::<HeartbeatResult<Vec<_>>>()?;

        let manager = Self::new(identity, config.manager.clone(), pools);
        info!(
            identity = %manager.identity.identity(),
            pools = manager.pools.len(),
            "manager initialized"
        );
        Ok(manager)
    }

    /// Override the start time.
    #[must_use]
    pub fn with_started_at(mut self, started_at: SystemTime) -> Self {
        self.started_at = started_at;
        self
    }

    /// Identity view of this manager.
    #[must_use]
    pub const fn identity(&self) -> &ProcessIdentity {
        &self.identity
    }

    /// Manager options.
    #[must_use]
    pub const fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// Pools in reporting order.
    #[must_use]
    pub fn pools(&self) -> &[Arc<WorkerPool>] {
        &self.pools
    }

    /// First pool draining `queue`.
    #[must_use]
    pub fn pool(&self, queue: &str) -> Option<&Arc<WorkerPool>> {
        self.pools.iter().find(|p| p.queue() == queue)
    }

    /// When the manager started.
    #[must_use]
    pub const fn started_at(&self) -> SystemTime {
        self.started_at
    }
}
