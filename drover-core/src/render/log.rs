use std::fmt::Write as _;
use std::sync::Mutex;
use std::time::Instant;

use super::{RECORD_PREFIX, lock, remember_message};
use crate::format::{Eta, format_duration, percent};
use crate::output::OutputHandle;
use crate::progress::{ProgressReporter, RenderOptions, ReporterKind};

/// Percentage step between consecutive log records.
pub const LOG_STEP: u64 = 10;

#[derive(Debug)]
struct LogState {
    output: OutputHandle,
    total: u64,
    message: String,
    started: Instant,
    /// Highest threshold already reported.
    reported: u64,
    finished: bool,
}

/// Determinate progress for pipes and CI logs.
///
/// Writes one line per 10% threshold crossed, each at most once and in
/// increasing order. 0% and 100% are never logged as thresholds; the
/// start and finish records cover them.
#[derive(Debug)]
pub struct LogReporter {
    show_eta: bool,
    state: Mutex<LogState>,
}

impl LogReporter {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            show_eta: options.show_eta,
            state: Mutex::new(LogState {
                output: options.output,
                total: options.total,
                message: String::new(),
                started: Instant::now(),
                reported: 0,
                finished: false,
            }),
        }
    }
}

/// Nearest lower multiple of [`LOG_STEP`] for a percentage.
fn threshold(pct: f64) -> u64 {
    (pct as u64 / LOG_STEP) * LOG_STEP
}

impl ProgressReporter for LogReporter {
    fn start(&self, message: &str) {
        let mut state = lock(&self.state);
        message.clone_into(&mut state.message);
        state.started = Instant::now();
        state.reported = 0;
        state.finished = false;

        let record = format!("{RECORD_PREFIX} {}: started\n", state.message);
        state.output.emit(&record);
    }

    fn update(&self, current: u64, message: &str) {
        let mut state = lock(&self.state);
        if state.finished {
            return;
        }
        remember_message(&mut state.message, message);
        let Some(pct) = percent(current, state.total) else {
            return;
        };
        let step = threshold(pct);
        if step == 0 || step >= 100 || step <= state.reported {
            return;
        }
        state.reported = step;

        let elapsed = state.started.elapsed();
        let mut record = format!(
            "{RECORD_PREFIX} {}: {step}% (elapsed {}",
            state.message,
            format_duration(elapsed)
        );
        if self.show_eta {
            let eta = Eta::estimate(elapsed, current, state.total);
            let _ = write!(record, ", ETA {eta}");
        }
        record.push_str(")\n");
        state.output.emit(&record);
    }

    fn set_total(&self, total: u64) {
        lock(&self.state).total = total;
    }

    fn finish(&self) {
        let mut state = lock(&self.state);
        if state.finished {
            return;
        }
        state.finished = true;
        let record = format!(
            "{RECORD_PREFIX} {}: done in {}\n",
            state.message,
            format_duration(state.started.elapsed())
        );
        state.output.emit(&record);
    }

    fn kind(&self) -> ReporterKind {
        ReporterKind::Log
    }
}
