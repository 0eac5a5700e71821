//! Tests for the heartbeat scheduler

use std::sync::Arc;
use std::time::Duration;

use prometheus_heartbeat::config::{HeartbeatConfig, WorkerPoolConfig};
use prometheus_heartbeat::core::{Manager, ProcessIdentity};
use prometheus_heartbeat::infra::InMemoryPublisher;
use prometheus_heartbeat::runtime::{HeartbeatScheduler, DEFAULT_HEARTBEAT_INTERVAL};

#[tokio::test(start_paused = true)]
async fn test_scheduler_from_config() {
    let config = HeartbeatConfig {
        pools: vec![WorkerPoolConfig::new().with_queue("default").with_concurrency(3)],
        ..HeartbeatConfig::default()
    };
    let identity = ProcessIdentity::from_parts("host-a", 3, "beef");
    let manager = Arc::new(Manager::from_config(&identity, &config).unwrap());
    let publisher = Arc::new(InMemoryPublisher::new());

    let scheduler = Arc::new(HeartbeatScheduler::from_config(&config, publisher.clone()));
    assert_eq!(scheduler.interval(), DEFAULT_HEARTBEAT_INTERVAL);
    scheduler.register(manager);

    let handle = Arc::clone(&scheduler).start();
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.stop().await;

    assert_eq!(publisher.sent(), 1);
    assert_eq!(scheduler.stats().ticks, 1);
    assert!(publisher.get("host-a:3:beef").is_some());
}
