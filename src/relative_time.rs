//! Relative-time helpers
//!
//! The presence endpoint reports idle time as free text ("12 minutes ago").
//! The first `<integer> <unit>` token drives both the sort key and the short
//! duration shown in tooltips.

use regex::Regex;
use std::sync::OnceLock;

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
}

fn relative_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s+(second|seconds|minute|minutes|hour|hours|day|days)")
            .expect("relative time pattern is valid")
    })
}

fn first_token(text: &str) -> Option<(u64, TimeUnit)> {
    let caps = relative_pattern().captures(text)?;
    let value = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let unit = match caps.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "second" | "seconds" => TimeUnit::Second,
        "minute" | "minutes" => TimeUnit::Minute,
        "hour" | "hours" => TimeUnit::Hour,
        "day" | "days" => TimeUnit::Day,
        _ => return None,
    };
    Some((value, unit))
}

/// Idle minutes for a relative-time string.
///
/// `None` stands for +infinity: the text had no recognizable token.
pub fn relative_to_minutes(text: &str) -> Option<u64> {
    let (value, unit) = first_token(text)?;
    Some(match unit {
        TimeUnit::Second => 0,
        TimeUnit::Minute => value,
        TimeUnit::Hour => value.saturating_mul(MINUTES_PER_HOUR),
        TimeUnit::Day => value.saturating_mul(MINUTES_PER_DAY),
    })
}

/// Sort key where unparsable text sorts after everything else
pub fn idle_sort_key(text: &str) -> u64 {
    relative_to_minutes(text).unwrap_or(u64::MAX)
}

/// Short duration text: "0m", "45m", "2h", "3d", or "" when unparsable
pub fn format_relative(text: &str) -> String {
    match first_token(text) {
        Some((_, TimeUnit::Second)) => "0m".to_string(),
        Some((value, TimeUnit::Minute)) => format!("{}m", value),
        Some((value, TimeUnit::Hour)) => format!("{}h", value),
        Some((value, TimeUnit::Day)) => format!("{}d", value),
        None => String::new(),
    }
}

/// Tooltip shown on idle traders
pub fn idle_tooltip(text: &str) -> String {
    format!("Idle: {}", format_relative(text))
}
