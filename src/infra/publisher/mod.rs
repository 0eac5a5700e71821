//! Publisher backends.

pub mod logging;
pub mod memory;

pub use logging::LogPublisher;
pub use memory::InMemoryPublisher;
