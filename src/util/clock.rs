//! Wall-clock helpers. The wire format carries whole unix seconds.

use std::time::{SystemTime, UNIX_EPOCH};

/// Whole seconds since the unix epoch for `time`; instants before the epoch map to negatives.
#[must_use]
pub fn unix_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_secs()).unwrap_or(i64::MAX),
    }
}

/// Current unix time in whole seconds.
#[must_use]
pub fn now_unix_secs() -> i64 {
    unix_secs(SystemTime::now())
}

/// Unix time of `time` in fractional seconds, `0.0` before the epoch.
#[must_use]
pub fn unix_secs_f64(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}
