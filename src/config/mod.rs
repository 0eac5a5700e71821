//! Configuration models for managers, pools and the heartbeat interval.

pub mod heartbeat;

pub use heartbeat::{HeartbeatConfig, ManagerOptions, WorkerPoolConfig};
