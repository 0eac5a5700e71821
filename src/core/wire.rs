//! Wire documents read by the process dashboard.
//!
//! Field names and nesting are fixed by the consumer. Two places embed JSON as a
//! *string* rather than as a nested object:
//!
//! - the info document is stored in the record as a string
//! - each in-flight job is serialized to a string, and that string becomes the
//!   `payload` field of a wrapper, which is serialized to a string again
//!
//! Both layers are produced by separate, sequential `serde_json::to_string` calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{HeartbeatResult, InProgressMessage};

/// Tag reported when the manager has no namespace.
pub const DEFAULT_TAG: &str = "default";

/// Process description embedded as a string in the heartbeat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatInfo {
    /// Hostname, with `:displayName` appended when configured.
    pub hostname: String,
    /// Manager start time, unix seconds.
    pub started_at: i64,
    /// OS process id.
    pub pid: u32,
    /// Namespace without `:` characters, or `default`.
    pub tag: String,
    /// Sum of pool concurrency.
    pub concurrency: usize,
    /// One queue name per pool, duplicates kept.
    pub queues: Vec<String>,
    /// Always empty.
    pub labels: Vec<String>,
    /// Identity string of the process.
    pub identity: String,
}

/// Inner per-job document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerMessage {
    /// Fixed at 1.
    pub retry: u32,
    /// Queue the job came from.
    pub queue: String,
    /// Fixed at false.
    pub backtrace: bool,
    /// Job class.
    pub class: String,
    /// Job arguments, never null.
    pub args: Vec<Value>,
    /// Job id.
    pub jid: String,
    /// Carries the runner's start time, not the job's creation time.
    pub created_at: i64,
    /// Snapshot wall-clock time.
    pub enqueued_at: i64,
}

/// Outer per-job document stored under the job's transaction id.
///
/// Older producers also emitted a `"tid":""` field here that was never filled.
/// It is not sent; consumers must not rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerMessageWrapper {
    /// Queue the job came from.
    pub queue: String,
    /// Serialized [`WorkerMessage`].
    pub payload: String,
    /// Runner start time, unix seconds.
    pub run_at: i64,
}

/// Dashboard tag for a namespace.
#[must_use]
pub fn namespace_tag(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => ns.replace(':', ""),
        _ => DEFAULT_TAG.to_string(),
    }
}

impl WorkerMessage {
    /// Build the inner document for a job observed at `enqueued_at`.
    #[must_use]
    pub fn from_in_progress(queue: &str, msg: &InProgressMessage, enqueued_at: i64) -> Self {
        Self {
            retry: 1,
            queue: queue.to_string(),
            backtrace: false,
            class: msg.class.clone(),
            args: msg.args.clone().unwrap_or_default(),
            jid: msg.jid.clone(),
            created_at: msg.started_at,
            enqueued_at,
        }
    }
}

/// Serialize the info document.
///
/// # Errors
///
/// Returns `HeartbeatError::Serialization` if serialization fails.
pub fn encode_info(info: &HeartbeatInfo) -> HeartbeatResult<String> {
    Ok(serde_json::to_string(info)?)
}

/// Serialize one in-flight job into its wrapper string.
///
/// # Errors
///
/// Returns `HeartbeatError::Serialization` if either layer fails to serialize.
pub fn encode_worker_message(
    queue: &str,
    msg: &InProgressMessage,
    enqueued_at: i64,
) -> HeartbeatResult<String> {
    let payload = serde_json::to_string(&WorkerMessage::from_in_progress(queue, msg, enqueued_at))?;
    let wrapper = WorkerMessageWrapper {
        queue: queue.to_string(),
        payload,
        run_at: msg.started_at,
    };
    Ok(serde_json::to_string(&wrapper)?)
}
