//! Choosing a renderer for the current environment.

use std::sync::Arc;

use tracing::debug;

use crate::config::ProgressConfig;
use crate::progress::{NoopReporter, ProgressReporter, RenderOptions, ReporterKind};
use crate::render::{BarReporter, JsonStreamReporter, LogReporter, SpinnerReporter};

/// Decide which renderer variant fits `config` and the call-time options.
///
/// Branches are ordered and the first match wins:
/// 1. progress disabled → noop
/// 2. JSON result with event streaming → JSON stream
/// 3. JSON result without streaming → noop, so text never corrupts the result
/// 4. unknown total → spinner
/// 5. terminal output → bar
/// 6. otherwise → line log
pub fn choose(config: &ProgressConfig, total: u64, terminal: bool) -> ReporterKind {
    if config.disabled {
        ReporterKind::Noop
    } else if config.format.is_machine_readable() {
        if config.stream_events {
            ReporterKind::JsonStream
        } else {
            ReporterKind::Noop
        }
    } else if total == 0 {
        ReporterKind::Spinner
    } else if terminal {
        ReporterKind::Bar
    } else {
        ReporterKind::Log
    }
}

/// Build the renderer for one operation.
///
/// A throttle left unset in `options` takes the configured default.
pub fn select(config: &ProgressConfig, mut options: RenderOptions) -> Arc<dyn ProgressReporter> {
    if options.throttle.is_none() {
        options.throttle = Some(config.throttle());
    }
    let kind = choose(config, options.total, options.output.is_terminal());
    debug!(%kind, total = options.total, "Selected progress renderer");

    match kind {
        ReporterKind::Noop => Arc::new(NoopReporter),
        ReporterKind::JsonStream => Arc::new(JsonStreamReporter::new(options)),
        ReporterKind::Spinner => Arc::new(SpinnerReporter::new(options)),
        ReporterKind::Bar => Arc::new(BarReporter::new(options)),
        ReporterKind::Log => Arc::new(LogReporter::new(options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::output::OutputHandle;

    fn options(total: u64, terminal: bool) -> RenderOptions {
        RenderOptions::new(total).with_output(OutputHandle::from_writer(Vec::new(), terminal))
    }

    fn json(stream_events: bool) -> ProgressConfig {
        ProgressConfig {
            format: OutputFormat::Json,
            stream_events,
            ..ProgressConfig::default()
        }
    }

    #[test]
    fn disabled_wins_over_everything() {
        let config = ProgressConfig {
            disabled: true,
            ..json(true)
        };
        for (total, terminal) in [(0, false), (0, true), (100, false), (100, true)] {
            assert_eq!(select(&config, options(total, terminal)).kind(), ReporterKind::Noop);
        }
    }

    #[test]
    fn json_without_streaming_is_silent() {
        assert_eq!(select(&json(false), options(100, true)).kind(), ReporterKind::Noop);
        assert_eq!(select(&json(false), options(0, false)).kind(), ReporterKind::Noop);
    }

    #[test]
    fn json_with_streaming_streams() {
        assert_eq!(
            select(&json(true), options(100, true)).kind(),
            ReporterKind::JsonStream
        );
        assert_eq!(
            select(&json(true), options(0, false)).kind(),
            ReporterKind::JsonStream
        );
    }

    #[test]
    fn unknown_total_spins() {
        let config = ProgressConfig::default();
        assert_eq!(select(&config, options(0, true)).kind(), ReporterKind::Spinner);
        assert_eq!(select(&config, options(0, false)).kind(), ReporterKind::Spinner);
    }

    #[test]
    fn known_total_depends_on_terminal() {
        let config = ProgressConfig::default();
        assert_eq!(select(&config, options(100, true)).kind(), ReporterKind::Bar);
        assert_eq!(select(&config, options(100, false)).kind(), ReporterKind::Log);
    }

    #[test]
    fn stream_flag_alone_does_nothing_for_text() {
        let config = ProgressConfig {
            stream_events: true,
            ..ProgressConfig::default()
        };
        assert_eq!(choose(&config, 100, false), ReporterKind::Log);
    }
}
