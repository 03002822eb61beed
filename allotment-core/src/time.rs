// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::{SystemTime, UNIX_EPOCH};

/// UNIX timestamp in seconds.
pub type Timestamp = u64;

pub fn current_timestamp() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        // Clocks set before 1970 are treated as the epoch itself.
        .unwrap_or_default()
}
