//! Periodic heartbeat driver on the tokio runtime.

pub mod scheduler;

pub use scheduler::{
    HeartbeatHandle, HeartbeatScheduler, SchedulerStats, TickReport, DEFAULT_HEARTBEAT_INTERVAL,
};
