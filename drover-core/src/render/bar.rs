use std::fmt::Write as _;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use super::{CLEAR_EOL, Throttle, lock, remember_message};
use crate::format::{Eta, percent};
use crate::output::OutputHandle;
use crate::progress::{ProgressReporter, RenderOptions, ReporterKind};

/// Number of cells in the bar body.
pub const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Finished,
}

#[derive(Debug)]
struct BarState {
    output: OutputHandle,
    phase: Phase,
    total: u64,
    current: u64,
    message: String,
    started: Instant,
    throttle: Throttle,
}

/// Determinate progress bar redrawn in place on an interactive terminal.
#[derive(Debug)]
pub struct BarReporter {
    show_eta: bool,
    state: Mutex<BarState>,
}

impl BarReporter {
    pub fn new(options: RenderOptions) -> Self {
        let throttle = Throttle::new(options.throttle_or_default());
        Self {
            show_eta: options.show_eta,
            state: Mutex::new(BarState {
                output: options.output,
                phase: Phase::Idle,
                total: options.total,
                current: 0,
                message: String::new(),
                started: Instant::now(),
                throttle,
            }),
        }
    }

    fn render(&self, state: &BarState, elapsed: Duration) -> String {
        let pct = percent(state.current, state.total).unwrap_or(0.0);
        let mut line = format!("\r{} {pct:>3.0}%", render_bar(pct));
        if self.show_eta && state.total > 0 {
            let eta = Eta::estimate(elapsed, state.current, state.total);
            let _ = write!(line, " ETA {eta}");
        }
        if !state.message.is_empty() {
            line.push(' ');
            line.push_str(&state.message);
        }
        line.push_str(CLEAR_EOL);
        line
    }
}

/// Draw the bracketed bar body for a percentage in `[0, 100]`.
///
/// The `>` marker sits between the filled and empty cells, so it appears
/// only once some progress exists and disappears when the bar is full.
pub fn render_bar(pct: f64) -> String {
    let filled = ((pct * BAR_WIDTH as f64 / 100.0) as usize).min(BAR_WIDTH);
    let mut bar = String::with_capacity(BAR_WIDTH + 2);
    bar.push('[');
    bar.push_str(&"=".repeat(filled));
    let mut empty = BAR_WIDTH - filled;
    if pct > 0.0 && empty > 0 {
        bar.push('>');
        empty -= 1;
    }
    bar.push_str(&" ".repeat(empty));
    bar.push(']');
    bar
}

impl ProgressReporter for BarReporter {
    fn start(&self, message: &str) {
        let mut state = lock(&self.state);
        state.phase = Phase::Running;
        state.current = 0;
        message.clone_into(&mut state.message);
        state.started = Instant::now();
        state.throttle.reset();
        debug!(total = state.total, "Progress bar started");
    }

    fn update(&self, current: u64, message: &str) {
        let mut state = lock(&self.state);
        if state.phase == Phase::Finished {
            return;
        }
        state.current = current;
        remember_message(&mut state.message, message);

        let now = Instant::now();
        if !state.throttle.ready(now) {
            return;
        }
        let line = self.render(&state, now.saturating_duration_since(state.started));
        state.output.emit(&line);
    }

    fn set_total(&self, total: u64) {
        lock(&self.state).total = total;
    }

    fn finish(&self) {
        let mut state = lock(&self.state);
        if state.phase == Phase::Finished {
            return;
        }
        state.phase = Phase::Finished;
        state.current = state.total;

        let elapsed = state.started.elapsed();
        let mut line = self.render(&state, elapsed);
        line.push('\n');
        state.output.emit(&line);
    }

    fn kind(&self) -> ReporterKind {
        ReporterKind::Bar
    }
}
