//! # Prometheus Heartbeat
//!
//! Liveness and status reporting for processes that run Prometheus worker pools.
//!
//! Every process ("manager") owns one or more worker pools, each draining a named
//! queue through a fixed number of runners. Independently of job execution, the
//! process periodically publishes a compact snapshot of its identity, capacity and
//! in-flight jobs to an external store, so a fleet-wide dashboard can list live
//! processes and the work they are doing without access to process memory.
//!
//! ## Pieces
//!
//! - **Process identity**: generated once at startup from OS randomness
//!   ([`core::ProcessIdentity`]) and passed explicitly to every manager
//! - **Snapshot aggregator**: walks each pool under its lock, copies the in-flight
//!   messages out and releases the lock before any encoding ([`core::build_snapshot`])
//! - **Wire encoder**: produces the two-layer, string-embedded JSON format the
//!   dashboard already parses ([`core::wire`])
//! - **Heartbeat scheduler**: one cancellable periodic task that snapshots and
//!   publishes every registered manager in order ([`runtime::HeartbeatScheduler`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prometheus_heartbeat::config::HeartbeatConfig;
//! use prometheus_heartbeat::core::{Manager, ProcessIdentity};
//! use prometheus_heartbeat::infra::InMemoryPublisher;
//! use prometheus_heartbeat::runtime::HeartbeatScheduler;
//!
//! let config = HeartbeatConfig::from_env()?;
//! let identity = ProcessIdentity::generate()?;
//! let manager = Arc::new(Manager::from_config(&identity, &config)?);
//!
//! let scheduler = Arc::new(HeartbeatScheduler::from_config(
//!     &config,
//!     Arc::new(InMemoryPublisher::new()),
//! ));
//! scheduler.register(Arc::clone(&manager));
//! let handle = scheduler.start();
//!
//! // ... run jobs ...
//!
//! handle.stop().await;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Identity, worker pools, snapshot aggregation and wire encoding.
pub mod core;
/// Configuration models for managers, pools and the heartbeat interval.
pub mod config;
/// Publisher adapters that deliver heartbeat records.
pub mod infra;
/// Periodic heartbeat driver on the tokio runtime.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;
