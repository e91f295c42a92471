//! Write timestamps in the store's microsecond unit.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in microseconds since the Unix epoch, the unit write
/// timestamps are expressed in.
pub fn now_micros() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or_default()
}
