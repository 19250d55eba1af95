use std::time::{SystemTime, UNIX_EPOCH};

fn since_epoch() -> std::time::Duration {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
}

/// Get a timestamp in seconds since the UNIX epoch
pub fn timestamp_secs() -> u64 {
    since_epoch().as_secs()
}

/// Milliseconds since the UNIX epoch, for input event timestamps
pub fn timestamp_ms() -> u64 {
    since_epoch().as_millis() as u64
}
