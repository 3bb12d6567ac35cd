//! Human-readable uptime.

use std::time::Duration;

/// Format a duration as `{days}d {hours}h {minutes}m`. Seconds are dropped.
pub fn format_uptime(elapsed: Duration) -> String {
    let mut secs = elapsed.as_secs();
    let days = secs / 86_400;
    secs %= 86_400;
    let hours = secs / 3600;
    secs %= 3600;
    let minutes = secs / 60;
    format!("{days}d {hours}h {minutes}m")
}
