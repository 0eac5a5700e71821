//! Identity, worker pools, snapshot aggregation and wire encoding.

pub mod error;
pub mod identity;
pub mod manager;
pub mod publisher;
pub mod snapshot;
pub mod wire;
pub mod worker_pool;

pub use error::{AppResult, HeartbeatError, HeartbeatResult};
pub use identity::{generate_nonce, generate_nonce_from, resolve_hostname, ProcessIdentity};
pub use manager::Manager;
pub use publisher::Publisher;
pub use snapshot::{build_snapshot, collect_pools, HeartbeatRecord, PoolSnapshot};
pub use wire::{
    encode_info, encode_worker_message, namespace_tag, HeartbeatInfo, WorkerMessage,
    WorkerMessageWrapper,
};
pub use worker_pool::{InProgressMessage, Runner, WorkerPool};
