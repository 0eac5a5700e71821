//! Tests for publisher implementations

use std::sync::Arc;

use prometheus_heartbeat::config::ManagerOptions;
use prometheus_heartbeat::core::{
    build_snapshot, InProgressMessage, Manager, ProcessIdentity, Publisher, WorkerPool,
};
use prometheus_heartbeat::infra::{InMemoryPublisher, LogPublisher};

fn make_manager() -> (Manager, Arc<WorkerPool>) {
    let pool = Arc::new(WorkerPool::new("default", 2));
    let manager = Manager::new(
        &ProcessIdentity::from_parts("host-a", 10, "ffff"),
        ManagerOptions::default(),
        vec![Arc::clone(&pool)],
    );
    (manager, pool)
}

#[tokio::test]
async fn test_in_memory_publisher_refreshes_entry() {
    let publisher = InMemoryPublisher::new();
    let (manager, pool) = make_manager();

    publisher.send(build_snapshot(&manager)).await.unwrap();
    pool.start_job(0, InProgressMessage::new("Send", "j1", None).with_tid("t1"))
        .unwrap();
    publisher.send(build_snapshot(&manager)).await.unwrap();

    assert_eq!(publisher.len(), 1);
    let stored = publisher.get("host-a:10:ffff").unwrap();
    assert_eq!(stored.busy, 1);
    assert!(stored.worker_messages.contains_key("t1"));
}

#[tokio::test]
async fn test_log_publisher_send() {
    let (manager, _pool) = make_manager();
    assert!(LogPublisher.send(build_snapshot(&manager)).await.is_ok());
}
