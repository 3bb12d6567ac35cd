//! Reply text with `{uptime}` and `{time}` placeholders.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};
use wabot_core::uptime::format_uptime;

const UPTIME: &str = "{uptime}";
const TIME: &str = "{time}";

/// Values substituted into templates when a reply is rendered.
#[derive(Debug, Clone)]
pub struct ReplyContext {
    pub uptime: Duration,
    pub now: DateTime<Local>,
}

impl ReplyContext {
    /// Snapshot uptime and wall-clock time now.
    pub fn capture(started: Instant) -> Self {
        Self {
            uptime: started.elapsed(),
            now: Local::now(),
        }
    }
}

/// Format a timestamp like `10/17/2026, 3:04:05 PM`.
pub fn format_time(now: &DateTime<Local>) -> String {
    now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// A reply as written in the tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTemplate {
    text: String,
    dynamic: bool,
}

impl ReplyTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let dynamic = text.contains(UPTIME) || text.contains(TIME);
        Self { text, dynamic }
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Expand placeholders. Static templates are returned as-is.
    pub fn render(&self, ctx: &ReplyContext) -> String {
        if !self.dynamic {
            return self.text.clone();
        }
        let mut out = self.text.clone();
        if out.contains(UPTIME) {
            out = out.replace(UPTIME, &format_uptime(ctx.uptime));
        }
        if out.contains(TIME) {
            out = out.replace(TIME, &format_time(&ctx.now));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx() -> ReplyContext {
        ReplyContext {
            uptime: Duration::from_secs(86_400 + 2 * 3600 + 3 * 60),
            now: Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
        }
    }

    #[test]
    fn test_static_template_renders_verbatim() {
        let t = ReplyTemplate::new("Goodbye! 👋 Have a great day!");
        assert_eq!(t.render(&ctx()), "Goodbye! 👋 Have a great day!");
    }

    #[test]
    fn test_uptime_placeholder() {
        let t = ReplyTemplate::new("Uptime: {uptime}");
        assert_eq!(t.render(&ctx()), "Uptime: 1d 2h 3m");
    }

    #[test]
    fn test_time_placeholder() {
        let t = ReplyTemplate::new("🕒 Current time: {time}");
        assert_eq!(t.render(&ctx()), "🕒 Current time: 3/5/2024, 2:07:09 PM");
    }

    #[test]
    fn test_format_time_morning() {
        let now = Local.with_ymd_and_hms(2024, 12, 31, 0, 5, 0).unwrap();
        assert_eq!(format_time(&now), "12/31/2024, 12:05:00 AM");
    }

    #[test]
    fn test_unknown_braces_untouched() {
        let t = ReplyTemplate::new("{name} at {uptime}");
        assert_eq!(t.render(&ctx()), "{name} at 1d 2h 3m");
    }
}
