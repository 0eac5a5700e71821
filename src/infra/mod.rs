//! Publisher adapters that deliver heartbeat records.

pub mod publisher;

pub use publisher::{InMemoryPublisher, LogPublisher};
