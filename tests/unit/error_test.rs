//! Tests for error types

use prometheus_heartbeat::core::HeartbeatError;

#[test]
fn test_entropy_unavailable_error() {
    let err = HeartbeatError::EntropyUnavailable("getrandom failed".to_string());
    assert_eq!(format!("{}", err), "entropy unavailable: getrandom failed");
}

#[test]
fn test_publish_error() {
    let err = HeartbeatError::Publish("connection refused".to_string());
    assert_eq!(format!("{}", err), "publish failed: connection refused");
}

#[test]
fn test_invalid_config_error() {
    let err = HeartbeatError::InvalidConfig("interval_secs must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: interval_secs must be greater than 0"
    );
}

#[test]
fn test_invalid_slot_error() {
    let err = HeartbeatError::InvalidSlot { slot: 7, concurrency: 5 };
    assert_eq!(format!("{}", err), "runner slot 7 out of range for concurrency 5");
}

#[test]
fn test_serialization_error_from_serde() {
    let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: HeartbeatError = serde_err.into();
    assert!(format!("{}", err).starts_with("serialization error:"));
}
