//! Tests for utility functions

use std::time::{Duration, UNIX_EPOCH};

use prometheus_heartbeat::util::{init_tracing, unix_secs, unix_secs_f64};

#[test]
fn test_unix_secs() {
    let t = UNIX_EPOCH + Duration::from_secs(1000);
    assert_eq!(unix_secs(t), 1000);
    assert!((unix_secs_f64(t) - 1000.0).abs() < f64::EPSILON);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
