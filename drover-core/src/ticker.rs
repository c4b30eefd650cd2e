//! Background ticking task that keeps a reporter moving while opaque work runs.
//!
//! The protocol between the ticker and the primary path:
//! - before every tick-driven update the task checks its stop flag and the
//!   parent [`CancellationToken`]; either one ends the loop without output;
//! - [`Ticker::stop`] raises the flag and waits for the task to exit;
//! - only after `stop` returns may the caller call
//!   [`finish`](ProgressReporter::finish).
//!
//! This keeps the last tick from racing with, or landing after, the
//! completion draw.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::progress::ProgressReporter;

/// One tick-driven update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tick {
    pub current: u64,
    pub message: String,
}

impl Tick {
    pub fn new(current: u64, message: impl Into<String>) -> Self {
        Self {
            current,
            message: message.into(),
        }
    }
}

/// Handle to a running ticking task.
///
/// Dropping the handle signals the task to stop without waiting for it;
/// use [`Ticker::stop`] when the caller needs the barrier.
#[derive(Debug)]
pub struct Ticker {
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a task calling `reporter.update` once per `period`.
    ///
    /// `source` maps the time since spawn to the values to report. The first
    /// update happens one full period after spawning.
    pub fn spawn<S>(
        reporter: Arc<dyn ProgressReporter>,
        period: Duration,
        cancel: CancellationToken,
        source: S,
    ) -> Self
    where
        S: FnMut(Duration) -> Tick + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());
        let handle = tokio::spawn(tick_loop(
            reporter,
            period,
            cancel,
            Arc::clone(&stop),
            Arc::clone(&wake),
            source,
        ));
        Self {
            stop,
            wake,
            handle: Some(handle),
        }
    }

    /// Whether the task has already exited (stopped, cancelled, or panicked).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Signal the task to stop and wait until it has fully terminated.
    pub async fn stop(mut self) {
        self.signal();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Progress ticker ended abnormally");
            }
        }
    }

    fn signal(&self) {
        self.stop.store(true, Ordering::Release);
        self.wake.notify_one();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.signal();
        }
    }
}

async fn tick_loop<S>(
    reporter: Arc<dyn ProgressReporter>,
    period: Duration,
    cancel: CancellationToken,
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
    mut source: S,
) where
    S: FnMut(Duration) -> Tick + Send + 'static,
{
    let started = Instant::now();
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    interval.tick().await;

    let mut ticks = 0u64;
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = wake.notified() => break,
            _ = interval.tick() => {}
        }
        if stop.load(Ordering::Acquire) || cancel.is_cancelled() {
            break;
        }
        let tick = source(started.elapsed());
        reporter.update(tick.current, &tick.message);
        ticks += 1;
    }
    debug!(ticks, "Progress ticker stopped");
}

/// Run `work` with a started reporter and a ticker, then finish the reporter.
///
/// The ticker is stopped and joined before `finish` is called, even when
/// `work` returns early because `cancel` fired.
pub async fn track<F, S, T>(
    reporter: Arc<dyn ProgressReporter>,
    message: &str,
    period: Duration,
    cancel: CancellationToken,
    source: S,
    work: F,
) -> T
where
    F: Future<Output = T>,
    S: FnMut(Duration) -> Tick + Send + 'static,
{
    reporter.start(message);
    let ticker = Ticker::spawn(Arc::clone(&reporter), period, cancel, source);
    let output = work.await;
    ticker.stop().await;
    reporter.finish();
    output
}

/// Map elapsed time onto an estimated duration, in whole seconds.
///
/// The result stays below `estimate` so a bar reaches 100% only when the
/// operation actually finishes. With no estimate (zero), elapsed seconds
/// are returned as-is.
pub fn estimated_progress(elapsed: Duration, estimate: Duration) -> u64 {
    let secs = elapsed.as_secs();
    let total = estimate.as_secs();
    if total == 0 {
        secs
    } else {
        secs.min(total - 1)
    }
}
