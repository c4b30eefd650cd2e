use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{CLEAR_EOL, RECORD_PREFIX, Throttle, lock, remember_message};
use crate::format::format_duration;
use crate::output::OutputHandle;
use crate::progress::{ProgressReporter, RenderOptions, ReporterKind};

/// Animation frames, cycled once per drawn update.
pub const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spacing between "still running" records on non-interactive outputs.
///
/// Independent of the caller's throttle interval. Records are only emitted
/// from `update`; the spinner never schedules output on its own.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct SpinnerState {
    output: OutputHandle,
    message: String,
    started: Instant,
    frame: usize,
    throttle: Throttle,
    last_record: Instant,
    finished: bool,
}

/// Indeterminate progress for operations whose total is unknown.
///
/// On a terminal it animates in place; elsewhere it writes a record at
/// start, a heartbeat while updates keep arriving, and one at finish.
/// The `current` value passed to `update` is ignored.
#[derive(Debug)]
pub struct SpinnerReporter {
    interactive: bool,
    state: Mutex<SpinnerState>,
}

impl SpinnerReporter {
    pub fn new(options: RenderOptions) -> Self {
        let now = Instant::now();
        Self {
            interactive: options.output.is_terminal(),
            state: Mutex::new(SpinnerState {
                throttle: Throttle::new(options.throttle_or_default()),
                output: options.output,
                message: String::new(),
                started: now,
                frame: 0,
                last_record: now,
                finished: false,
            }),
        }
    }

    /// Handle an update observed at `now`.
    fn update_at(&self, message: &str, now: Instant) {
        let mut state = lock(&self.state);
        if state.finished {
            return;
        }
        remember_message(&mut state.message, message);

        if self.interactive {
            if state.throttle.ready(now) {
                Self::draw_frame(&mut state, now);
            }
        } else if now.saturating_duration_since(state.last_record) >= HEARTBEAT_INTERVAL {
            state.last_record = now;
            let elapsed = format_duration(now.saturating_duration_since(state.started));
            let record = format!(
                "{RECORD_PREFIX} {}: still running (elapsed {elapsed})\n",
                state.message
            );
            state.output.emit(&record);
        }
    }

    fn draw_frame(state: &mut SpinnerState, now: Instant) {
        let glyph = SPINNER_FRAMES[state.frame % SPINNER_FRAMES.len()];
        state.frame = (state.frame + 1) % SPINNER_FRAMES.len();
        let elapsed = format_duration(now.saturating_duration_since(state.started));
        let line = format!("\r{glyph} {} ({elapsed}){CLEAR_EOL}", state.message);
        state.output.emit(&line);
    }
}

impl ProgressReporter for SpinnerReporter {
    fn start(&self, message: &str) {
        let mut state = lock(&self.state);
        let now = Instant::now();
        message.clone_into(&mut state.message);
        state.started = now;
        state.last_record = now;
        state.frame = 0;
        state.finished = false;
        state.throttle.reset();

        if !self.interactive {
            let record = format!("{RECORD_PREFIX} {}: started\n", state.message);
            state.output.emit(&record);
        }
    }

    fn update(&self, _current: u64, message: &str) {
        self.update_at(message, Instant::now());
    }

    fn set_total(&self, _total: u64) {}

    fn finish(&self) {
        let mut state = lock(&self.state);
        if state.finished {
            return;
        }
        state.finished = true;
        let elapsed = format_duration(state.started.elapsed());

        let record = if self.interactive {
            format!("\r✓ {} (done in {elapsed}){CLEAR_EOL}\n", state.message)
        } else {
            format!("{RECORD_PREFIX} {}: done in {elapsed}\n", state.message)
        };
        state.output.emit(&record);
    }

    fn kind(&self) -> ReporterKind {
        ReporterKind::Spinner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::Capture;

    fn spinner(terminal: bool, capture: &Capture) -> SpinnerReporter {
        SpinnerReporter::new(
            RenderOptions::new(0)
                .with_output(capture.handle(terminal))
                .with_throttle(Duration::ZERO),
        )
    }

    #[test]
    fn interactive_cycles_frames() {
        let capture = Capture::default();
        let reporter = spinner(true, &capture);
        reporter.start("restoring");
        assert!(capture.records().is_empty());

        for i in 0..=SPINNER_FRAMES.len() {
            reporter.update(i as u64, "");
        }
        let records = capture.records();
        assert_eq!(records.len(), SPINNER_FRAMES.len() + 1);
        assert!(records[0].starts_with(&format!("\r{} restoring", SPINNER_FRAMES[0])));
        assert!(records[1].starts_with(&format!("\r{} restoring", SPINNER_FRAMES[1])));
        // wraps around after the last frame
        assert!(records[SPINNER_FRAMES.len()].starts_with(&format!("\r{}", SPINNER_FRAMES[0])));
        assert!(records.iter().all(|r| r.ends_with(CLEAR_EOL)));
    }

    #[test]
    fn interactive_respects_throttle() {
        let capture = Capture::default();
        let reporter = SpinnerReporter::new(
            RenderOptions::new(0)
                .with_output(capture.handle(true))
                .with_throttle(Duration::from_secs(3600)),
        );
        reporter.start("restoring");
        reporter.update(0, "");
        reporter.update(0, "");
        assert_eq!(capture.records().len(), 1);
    }

    #[test]
    fn interactive_finish_prints_mark() {
        let capture = Capture::default();
        let reporter = spinner(true, &capture);
        reporter.start("restoring");
        reporter.update(0, "");
        reporter.finish();

        let last = capture.records().pop().unwrap();
        assert!(last.starts_with("\r✓ restoring (done in 0s)"));
        assert!(last.ends_with('\n'));
    }

    #[test]
    fn non_interactive_logs_start_and_finish_only() {
        let capture = Capture::default();
        let reporter = spinner(false, &capture);
        reporter.start("restoring");
        for _ in 0..100 {
            reporter.update(0, "");
        }
        reporter.finish();

        let records = capture.records();
        assert_eq!(
            records,
            vec![
                "[progress] restoring: started\n".to_string(),
                "[progress] restoring: done in 0s\n".to_string(),
            ]
        );
    }

    #[test]
    fn non_interactive_heartbeat_every_thirty_seconds() {
        let capture = Capture::default();
        let reporter = spinner(false, &capture);
        reporter.start("restoring");
        let base = lock(&reporter.state).last_record;

        reporter.update_at("copying", base + Duration::from_secs(29));
        assert_eq!(capture.records().len(), 1);

        reporter.update_at("", base + HEARTBEAT_INTERVAL);
        let records = capture.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], "[progress] copying: still running (elapsed 30s)\n");

        // the next record is due 30s after the previous one, not after start
        reporter.update_at("", base + Duration::from_secs(59));
        assert_eq!(capture.records().len(), 2);
        reporter.update_at("", base + Duration::from_secs(60));
        let records = capture.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], "[progress] copying: still running (elapsed 1m)\n");

        reporter.finish();
        assert!(capture.records()[3].starts_with("[progress] copying: done in"));
    }

    #[test]
    fn set_total_is_ignored() {
        let capture = Capture::default();
        let reporter = spinner(false, &capture);
        reporter.start("restoring");
        reporter.set_total(100);
        assert_eq!(reporter.kind(), ReporterKind::Spinner);
        assert_eq!(capture.records().len(), 1);
    }
}
