//! Unit tests for individual components

mod config_test;
mod error_test;
mod publisher_test;
mod runtime_test;
mod util_test;
