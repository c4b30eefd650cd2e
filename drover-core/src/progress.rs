//! Progress reporting for long-running operations.
//!
//! Callers obtain a reporter from [`select`](crate::select::select) and depend
//! only on [`ProgressReporter`]. The sequence is always `start`, any number of
//! `update`/`set_total` calls, then exactly one `finish`. A reporter is owned
//! by one operation and discarded afterwards.

use std::fmt;
use std::time::Duration;

use crate::config::DEFAULT_THROTTLE;
use crate::output::OutputHandle;

/// Trait implemented by every progress renderer.
///
/// None of the methods return errors: output failures are logged and
/// swallowed so progress can never abort the real work. All methods take
/// `&self` so one reporter can be shared between the primary path and a
/// [`Ticker`](crate::ticker::Ticker).
pub trait ProgressReporter: Send + Sync {
    /// Begin the operation. Called once before any update.
    fn start(&self, message: &str);

    /// Report `current` units done, with an optional status message.
    fn update(&self, current: u64, message: &str);

    /// Set the total number of units once it becomes known.
    fn set_total(&self, total: u64);

    /// End the operation. Called exactly once.
    fn finish(&self);

    /// Which renderer variant this is.
    fn kind(&self) -> ReporterKind;
}

/// The renderer variants the selector can choose between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReporterKind {
    Noop,
    Spinner,
    Bar,
    Log,
    JsonStream,
}

impl fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Noop => "noop",
            Self::Spinner => "spinner",
            Self::Bar => "bar",
            Self::Log => "log",
            Self::JsonStream => "json-stream",
        };
        f.write_str(name)
    }
}

/// Call-time options handed to the selector.
#[derive(Debug)]
pub struct RenderOptions {
    /// Total units of work; `0` means unknown.
    pub total: u64,
    pub output: OutputHandle,
    pub show_eta: bool,
    /// Minimum time between redraws. `None` falls back to the configured default.
    pub throttle: Option<Duration>,
}

impl RenderOptions {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            output: OutputHandle::stderr(),
            show_eta: true,
            throttle: None,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputHandle) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn with_eta(mut self, show_eta: bool) -> Self {
        self.show_eta = show_eta;
        self
    }

    #[must_use]
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = Some(throttle);
        self
    }

    pub(crate) fn throttle_or_default(&self) -> Duration {
        self.throttle.unwrap_or(DEFAULT_THROTTLE)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

/// No-op reporter for disabled progress and structured-output runs.
#[derive(Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn start(&self, _message: &str) {}
    fn update(&self, _current: u64, _message: &str) {}
    fn set_total(&self, _total: u64) {}
    fn finish(&self) {}

    fn kind(&self) -> ReporterKind {
        ReporterKind::Noop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_reporter_is_silent() {
        let reporter = NoopReporter;
        reporter.start("test");
        reporter.set_total(100);
        reporter.update(50, "halfway");
        reporter.finish();
        assert_eq!(reporter.kind(), ReporterKind::Noop);
    }

    #[test]
    fn render_options_defaults() {
        let options = RenderOptions::new(10);
        assert_eq!(options.total, 10);
        assert!(options.show_eta);
        assert_eq!(options.throttle_or_default(), Duration::from_secs(1));

        let options = options
            .with_eta(false)
            .with_throttle(Duration::from_millis(5));
        assert!(!options.show_eta);
        assert_eq!(options.throttle_or_default(), Duration::from_millis(5));
    }

    #[test]
    fn kind_names() {
        assert_eq!(ReporterKind::JsonStream.to_string(), "json-stream");
        assert_eq!(ReporterKind::Bar.to_string(), "bar");
    }
}
