//! Tests for configuration validation

use prometheus_heartbeat::config::{HeartbeatConfig, ManagerOptions, WorkerPoolConfig};

#[test]
fn test_heartbeat_config_validation() {
    let valid = HeartbeatConfig {
        interval_secs: 5,
        manager: ManagerOptions::default(),
        pools: vec![WorkerPoolConfig::new().with_queue("default").with_concurrency(10)],
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_heartbeat_config_invalid_interval() {
    let invalid = HeartbeatConfig {
        interval_secs: 0,
        ..HeartbeatConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_invalid_queue() {
    let invalid = WorkerPoolConfig::new().with_queue("");
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_invalid_concurrency() {
    let invalid = HeartbeatConfig {
        pools: vec![WorkerPoolConfig::new().with_concurrency(0)],
        ..HeartbeatConfig::default()
    };
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("concurrency"));
}

#[test]
fn test_heartbeat_config_from_json() {
    let json = r#"{
        "interval_secs": 5,
        "manager": {
            "namespace": "billing:prod",
            "display_name": "worker-1"
        },
        "pools": [
            { "queue": "default", "concurrency": 5 },
            { "queue": "default", "concurrency": 2 }
        ]
    }"#;

    let config = HeartbeatConfig::from_json_str(json).unwrap();
    assert_eq!(config.manager.namespace.as_deref(), Some("billing:prod"));
    assert_eq!(config.pools.len(), 2);
    assert_eq!(config.pools[1].concurrency, 2);
}

#[test]
fn test_heartbeat_config_from_json_defaults() {
    let config = HeartbeatConfig::from_json_str("{}").unwrap();
    assert_eq!(config.interval_secs, 5);
    assert!(config.pools.is_empty());
    assert!(config.manager.display_name.is_none());
}

#[test]
fn test_heartbeat_config_from_json_rejects_garbage() {
    assert!(HeartbeatConfig::from_json_str("not json").is_err());
    assert!(HeartbeatConfig::from_json_str(r#"{"interval_secs": 0}"#).is_err());
}
