//! String formatting utilities for UI rendering.

use chrono::{DateTime, Utc};

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 1440;

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Human description of a delay, e.g. "1 day and 2 hours".
///
/// Below a day the minutes are kept; from a day up only whole hours are shown.
pub fn format_minutes(minutes: u64) -> String {
    if minutes < MINUTES_PER_HOUR {
        return plural(minutes, "minute");
    }
    if minutes < MINUTES_PER_DAY {
        let hours = minutes / MINUTES_PER_HOUR;
        let rest = minutes % MINUTES_PER_HOUR;
        return if rest == 0 {
            plural(hours, "hour")
        } else {
            format!("{} and {}", plural(hours, "hour"), plural(rest, "minute"))
        };
    }
    let days = minutes / MINUTES_PER_DAY;
    let hours = (minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
    if hours == 0 {
        plural(days, "day")
    } else {
        format!("{} and {}", plural(days, "day"), plural(hours, "hour"))
    }
}

/// Human description of a wait in seconds, e.g. "1 minute and 30 seconds".
pub fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        return plural(seconds, "second");
    }
    let rest = seconds % 60;
    if rest == 0 || seconds >= 3600 {
        return format_minutes(seconds.div_ceil(60));
    }
    format!("{} and {}", plural(seconds / 60, "minute"), plural(rest, "second"))
}

/// Countdown display: `{d}d HH:MM:SS`, days omitted when zero.
pub fn format_countdown(remaining_ms: u64) -> String {
    let total = remaining_ms.div_ceil(1000);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if days > 0 {
        format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Format an epoch-millisecond timestamp for display.
pub fn format_timestamp_millis(millis: i64, pretty: bool) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) if pretty => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        Some(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        None => millis.to_string(),
    }
}
