//! Display formatting for durations, byte sizes, and relative timestamps.

use crate::sizes::round_half_up;
use crate::types::Timestamp;

/// Placeholder shown when a value cannot be displayed.
pub const NOT_AVAILABLE: &str = "N/A";

/// SI unit symbols, base 1000.
const SIZE_UNITS: &[&str] = &["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// Format a duration in seconds as `m:ss`.
///
/// Seconds are rounded to the nearest whole second before splitting, so the
/// seconds component is always in `0..60`. Negative or non-finite input is
/// shown as `0:00`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        round_half_up(seconds) as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

// ---------------------------------------------------------------------------
// Byte sizes
// ---------------------------------------------------------------------------

/// Format a byte count with SI units and at most two decimals (`"259.33 kB"`).
///
/// Returns [`NOT_AVAILABLE`] for missing, non-positive, or non-finite sizes.
pub fn format_size(bytes: Option<f64>) -> String {
    let bytes = match bytes {
        Some(b) if b.is_finite() && b > 0.0 => b,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let max_exponent = SIZE_UNITS.len() - 1;
    let mut exponent = 0;
    let mut value = bytes;
    while value >= 1000.0 && exponent < max_exponent {
        value /= 1000.0;
        exponent += 1;
    }
    value = (value * 100.0).round() / 100.0;

    if value >= 1000.0 && exponent < max_exponent {
        value = 1.0;
        exponent += 1;
    }

    format!("{} {}", trim_decimals(value), SIZE_UNITS[exponent])
}

/// Render a float with up to two decimals and no trailing zeros.
fn trim_decimals(value: f64) -> String {
    let rendered = format!("{value:.2}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

// ---------------------------------------------------------------------------
// Relative time
// ---------------------------------------------------------------------------

/// Human-relative description of `then` as seen from `now`
/// (`"a few seconds ago"`, `"3 hours ago"`, `"in 2 days"`).
///
/// Thresholds: up to 44 s is "a few seconds", up to 89 s "a minute", up to
/// 44 min counted in minutes, up to 89 min "an hour", up to 21 h counted in
/// hours, up to 35 h "a day", up to 25 days counted in days, up to 45 days
/// "a month", up to 10 months counted in months, up to 17 months "a year",
/// beyond that counted in years.
pub fn relative_time(then: Timestamp, now: Timestamp) -> String {
    let delta_secs = (now - then).num_milliseconds() as f64 / 1000.0;
    let in_past = delta_secs >= 0.0;
    let secs = delta_secs.abs();

    let minutes = secs / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let months = days / 30.4375;
    let years = months / 12.0;

    let phrase = if round_half_up(secs) <= 44.0 {
        "a few seconds".to_string()
    } else if round_half_up(secs) <= 89.0 {
        "a minute".to_string()
    } else if round_half_up(minutes) <= 44.0 {
        format!("{} minutes", round_half_up(minutes) as i64)
    } else if round_half_up(minutes) <= 89.0 {
        "an hour".to_string()
    } else if round_half_up(hours) <= 21.0 {
        format!("{} hours", round_half_up(hours) as i64)
    } else if round_half_up(hours) <= 35.0 {
        "a day".to_string()
    } else if round_half_up(days) <= 25.0 {
        format!("{} days", round_half_up(days) as i64)
    } else if round_half_up(days) <= 45.0 {
        "a month".to_string()
    } else if round_half_up(months) <= 10.0 {
        format!("{} months", round_half_up(months) as i64)
    } else if round_half_up(months) <= 17.0 {
        "a year".to_string()
    } else {
        format!("{} years", round_half_up(years).max(2.0) as i64)
    };

    if in_past {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}
