//! Process identity used to key heartbeat records in the external store.
//!
//! The identity is generated exactly once per process and then handed to each
//! manager by reference. Managers that carry a display name derive their own view
//! with [`ProcessIdentity::with_display_name`]; the hostname, pid and nonce stay
//! shared so every view names the same process.

use std::ffi::OsString;

use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::{debug, warn};

use super::{HeartbeatError, HeartbeatResult};

/// Number of random bytes behind the process nonce.
pub const NONCE_BYTES: usize = 12;

/// Stable identity of this process instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    hostname: String,
    pid: u32,
    nonce: String,
    display_name: Option<String>,
}

/// Generate a process nonce from the OS random source.
///
/// # Errors
///
/// Returns `HeartbeatError::EntropyUnavailable` if the OS cannot supply bytes.
pub fn generate_nonce() -> HeartbeatResult<String> {
    generate_nonce_from(&mut OsRng)
}

/// Generate a nonce from the given random source: 12 bytes, hex encoded.
///
/// # Errors
///
/// Returns `HeartbeatError::EntropyUnavailable` if `rng` fails to fill the buffer.
pub fn generate_nonce_from<R: TryRngCore>(rng: &mut R) -> HeartbeatResult<String> {
    let mut bytes = [0u8; NONCE_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| HeartbeatError::EntropyUnavailable(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Resolve the local hostname, degrading to an empty string on failure.
#[must_use]
pub fn resolve_hostname() -> String {
    hostname_or_empty(hostname::get())
}

fn hostname_or_empty(lookup: std::io::Result<OsString>) -> String {
    match lookup.map(OsString::into_string) {
        Ok(Ok(name)) => name,
        Ok(Err(raw)) => {
            warn!(hostname = ?raw, "hostname is not valid UTF-8, reporting empty hostname");
            String::new()
        }
        Err(e) => {
            warn!(error = %e, "hostname lookup failed, reporting empty hostname");
            String::new()
        }
    }
}

impl ProcessIdentity {
    /// Build the identity for the running process.
    ///
    /// Call this once at startup. A failure here is fatal for heartbeat reporting:
    /// without a unique nonce, records from unrelated processes would collide.
    ///
    /// # Errors
    ///
    /// Returns `HeartbeatError::EntropyUnavailable` if no nonce can be generated.
    pub fn generate() -> HeartbeatResult<Self> {
        let nonce = generate_nonce()?;
        let identity = Self::from_parts(resolve_hostname(), std::process::id(), nonce);
        debug!(identity = %identity.identity(), "process identity generated");
        Ok(identity)
    }

    /// Assemble an identity from known parts.
    pub fn from_parts(hostname: impl Into<String>, pid: u32, nonce: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            pid,
            nonce: nonce.into(),
            display_name: None,
        }
    }

    /// Derive a view of this identity carrying a manager display name.
    ///
    /// Empty names are treated as unset.
    #[must_use]
    pub fn with_display_name(&self, display_name: Option<&str>) -> Self {
        Self {
            display_name: display_name.filter(|n| !n.is_empty()).map(str::to_owned),
            ..self.clone()
        }
    }

    /// Resolved hostname, without display name.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// OS process id.
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// 24-character hex nonce.
    #[must_use]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Configured display name, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Hostname as reported to the dashboard: `hostname[:displayName]`.
    #[must_use]
    pub fn display_hostname(&self) -> String {
        match &self.display_name {
            Some(name) => format!("{}:{name}", self.hostname),
            None => self.hostname.clone(),
        }
    }

    /// Identity string `hostname[:displayName]:pid:nonce`.
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}:{}:{}", self.display_hostname(), self.pid, self.nonce)
    }
}
