//! Heartbeat, manager and worker pool configuration structures.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Default seconds between heartbeat ticks.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Environment variable holding the tick interval in seconds.
pub const ENV_INTERVAL_SECS: &str = "HEARTBEAT_INTERVAL_SECS";
/// Environment variable holding the manager namespace.
pub const ENV_NAMESPACE: &str = "HEARTBEAT_NAMESPACE";
/// Environment variable holding the manager display name.
pub const ENV_DISPLAY_NAME: &str = "HEARTBEAT_DISPLAY_NAME";
/// Environment variable listing pools as `queue[=concurrency]`, comma separated.
pub const ENV_QUEUES: &str = "HEARTBEAT_QUEUES";

/// Worker pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPoolConfig {
    /// Queue drained by the pool.
    pub queue: String,
    /// Number of runners.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    num_cpus::get()
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            queue: "default".into(),
            concurrency: default_concurrency(),
        }
    }
}

impl WorkerPoolConfig {
    /// Create a configuration for the `default` queue with one runner per CPU.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the queue name.
    #[must_use]
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = queue.into();
        self
    }

    /// Set the runner count.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Validate pool configuration values.
    ///
    /// # Errors
    ///
    /// Returns a message if the queue name is empty or concurrency is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.queue.is_empty() {
            return Err("queue must not be empty".into());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".into());
        }
        Ok(())
    }
}

/// Manager options that shape the reported identity and tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerOptions {
    /// Namespace the manager's queues live under; reported as the tag.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Display name appended to the hostname.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Root heartbeat configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    /// Seconds between ticks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Options of the manager being reported.
    #[serde(default)]
    pub manager: ManagerOptions,
    /// Pools owned by the manager, in reporting order.
    #[serde(default)]
    pub pools: Vec<WorkerPoolConfig>,
}

const fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            manager: ManagerOptions::default(),
            pools: Vec::new(),
        }
    }
}

impl HeartbeatConfig {
    /// Validate the interval and every pool.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.interval_secs == 0 {
            return Err("interval_secs must be greater than 0".into());
        }
        for (idx, pool) in self.pools.iter().enumerate() {
            pool.validate()
                .map_err(|e| format!("pool #{idx} `{}` invalid: {e}", pool.queue))?;
        }
        Ok(())
    }

    /// Parse heartbeat configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a message on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading `.env` first if present.
    ///
    /// # Errors
    ///
    /// Fails if a variable is malformed or the result does not validate.
    pub fn from_env() -> AppResult<Self> {
        // A missing .env file is fine; the real environment still applies.
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Fails if a variable is malformed or the result does not validate.
    pub fn from_vars<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_INTERVAL_SECS) {
            cfg.interval_secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_INTERVAL_SECS}={raw:?} is not a number"))?;
        }
        cfg.manager.namespace = lookup(ENV_NAMESPACE).filter(|v| !v.is_empty());
        cfg.manager.display_name = lookup(ENV_DISPLAY_NAME).filter(|v| !v.is_empty());

        if let Some(raw) = lookup(ENV_QUEUES) {
            cfg.pools = parse_queue_list(&raw)?;
        }

        cfg.validate().map_err(|e| anyhow!(e))?;
        Ok(cfg)
    }
}

/// Parse `queue[=concurrency]` entries separated by commas.
fn parse_queue_list(raw: &str) -> AppResult<Vec<WorkerPoolConfig>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> AppResult<WorkerPoolConfig> {
            match entry.split_once('=') {
                Some((queue, concurrency)) => {
                    let concurrency = concurrency.trim().parse::<usize>().with_context(|| {
                        format!("bad concurrency in {ENV_QUEUES} entry {entry:?}")
                    })?;
                    Ok(WorkerPoolConfig::new()
                        .with_queue(queue.trim())
                        .with_concurrency(concurrency))
                }
                None => Ok(WorkerPoolConfig::new().with_queue(entry)),
            }
        })
        .collect()
}
