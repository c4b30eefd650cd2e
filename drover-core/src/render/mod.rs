//! Concrete [`ProgressReporter`](crate::progress::ProgressReporter) implementations.
//!
//! Every renderer keeps its mutable state, output handle included, behind a
//! single mutex. Each record is composed in memory and written with one
//! call, so concurrent callers never interleave partial lines.

pub mod bar;
pub mod json;
pub mod log;
pub mod spinner;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub use bar::BarReporter;
pub use json::{EventType, JsonStreamReporter, ProgressEvent};
pub use log::LogReporter;
pub use spinner::SpinnerReporter;

/// ANSI "erase to end of line", appended to in-place redraws.
pub const CLEAR_EOL: &str = "\x1b[K";

/// Prefix for line-oriented records on non-interactive outputs.
pub const RECORD_PREFIX: &str = "[progress]";

/// Lock a renderer's state. A panic in another caller must not silence
/// progress for the rest of the operation, so poisoning is ignored.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Gate enforcing a minimum interval between draws.
#[derive(Debug)]
pub(crate) struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns `true` and records the draw when `interval` has passed since
    /// the previous one. The first call always passes.
    pub(crate) fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.last = None;
    }
}

/// Replace the stored message unless the caller passed an empty one.
pub(crate) fn remember_message(slot: &mut String, message: &str) {
    if !message.is_empty() {
        message.clone_into(slot);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use crate::output::OutputHandle;

    /// Writer that records every `write` call as one chunk.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct Capture(Arc<Mutex<Vec<String>>>);

    impl Capture {
        pub(crate) fn handle(&self, terminal: bool) -> OutputHandle {
            OutputHandle::from_writer(self.clone(), terminal)
        }

        pub(crate) fn records(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }

        pub(crate) fn text(&self) -> String {
            self.records().concat()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(buf).into_owned());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
