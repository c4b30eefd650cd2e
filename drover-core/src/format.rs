//! Pure helpers shared by every renderer: duration strings, percentages and ETA.

use std::fmt;
use std::time::Duration;

/// Format a duration as a compact human string (`45s`, `2m 30s`, `1h 5m`).
///
/// Sub-second parts are rounded to the nearest second.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs() + u64::from(d.subsec_millis() >= 500);
    format_seconds(i64::try_from(secs).unwrap_or(i64::MAX))
}

/// Format a signed number of seconds. Negative values render as `0s`.
pub fn format_seconds(secs: i64) -> String {
    if secs <= 0 {
        return "0s".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{hours}h")
        }
    } else if minutes > 0 {
        if seconds > 0 {
            format!("{minutes}m {seconds}s")
        } else {
            format!("{minutes}m")
        }
    } else {
        format!("{seconds}s")
    }
}

/// Completed fraction as a percentage in `[0, 100]`, or `None` when the
/// total is unknown.
pub fn percent(current: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let pct = current as f64 / total as f64 * 100.0;
    Some(pct.clamp(0.0, 100.0))
}

/// Estimated time remaining for a determinate operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    /// Nothing has completed yet, so no rate is known.
    Computing,
    /// The estimate rounds to zero (or the operation overshot its total).
    UnderASecond,
    Remaining(Duration),
}

impl Eta {
    /// Linear estimate: `elapsed * (total - current) / current`, rounded to the second.
    pub fn estimate(elapsed: Duration, current: u64, total: u64) -> Self {
        if current == 0 {
            return Self::Computing;
        }
        let left = total as f64 - current as f64;
        let remaining = (elapsed.as_secs_f64() * left / current as f64).round();
        if remaining <= 0.0 {
            Self::UnderASecond
        } else {
            Self::Remaining(Duration::from_secs(remaining as u64))
        }
    }

    /// Whole seconds remaining, when there is a positive estimate.
    pub fn seconds(self) -> Option<u64> {
        match self {
            Self::Remaining(d) => Some(d.as_secs()),
            Self::Computing | Self::UnderASecond => None,
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computing => f.write_str("computing…"),
            Self::UnderASecond => f.write_str("<1s"),
            Self::Remaining(d) => f.write_str(&format_duration(*d)),
        }
    }
}
