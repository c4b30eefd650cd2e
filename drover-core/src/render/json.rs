use std::sync::Mutex;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Throttle, lock, remember_message};
use crate::error::ProgressError;
use crate::format::{Eta, percent};
use crate::output::OutputHandle;
use crate::progress::{ProgressReporter, RenderOptions, ReporterKind};

/// Discriminator of a progress event line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "progress_start")]
    Start,
    #[serde(rename = "progress")]
    Update,
    #[serde(rename = "progress_end")]
    End,
}

/// One newline-delimited JSON progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: EventType,
    /// `null` when the total is unknown.
    pub percent: Option<f64>,
    /// `null` until a positive estimate exists.
    pub eta_seconds: Option<u64>,
    pub message: String,
    /// Present on `progress_end` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ProgressEvent {
    pub fn to_line(&self) -> Result<String, ProgressError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[derive(Debug)]
struct JsonState {
    output: OutputHandle,
    total: u64,
    message: String,
    started: Instant,
    throttle: Throttle,
    finished: bool,
}

impl JsonState {
    fn send(&mut self, event: &ProgressEvent) {
        match event.to_line() {
            Ok(line) => self.output.emit(&line),
            Err(e) => warn!(error = %e, "Failed to encode progress event"),
        }
    }
}

/// Machine-readable progress as newline-delimited JSON events.
#[derive(Debug)]
pub struct JsonStreamReporter {
    show_eta: bool,
    state: Mutex<JsonState>,
}

impl JsonStreamReporter {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            show_eta: options.show_eta,
            state: Mutex::new(JsonState {
                throttle: Throttle::new(options.throttle_or_default()),
                output: options.output,
                total: options.total,
                message: String::new(),
                started: Instant::now(),
                finished: false,
            }),
        }
    }
}

/// Percentage rounded to one decimal place.
fn rounded_percent(current: u64, total: u64) -> Option<f64> {
    percent(current, total).map(|p| (p * 10.0).round() / 10.0)
}

impl ProgressReporter for JsonStreamReporter {
    fn start(&self, message: &str) {
        let mut state = lock(&self.state);
        message.clone_into(&mut state.message);
        state.started = Instant::now();
        state.finished = false;
        state.throttle.reset();

        let event = ProgressEvent {
            kind: EventType::Start,
            percent: rounded_percent(0, state.total),
            eta_seconds: None,
            message: state.message.clone(),
            duration_ms: None,
        };
        state.send(&event);
    }

    fn update(&self, current: u64, message: &str) {
        let mut state = lock(&self.state);
        if state.finished {
            return;
        }
        remember_message(&mut state.message, message);
        let now = Instant::now();
        if !state.throttle.ready(now) {
            return;
        }

        let eta_seconds = if self.show_eta && state.total > 0 {
            Eta::estimate(now.saturating_duration_since(state.started), current, state.total)
                .seconds()
        } else {
            None
        };
        let event = ProgressEvent {
            kind: EventType::Update,
            percent: rounded_percent(current, state.total),
            eta_seconds,
            message: state.message.clone(),
            duration_ms: None,
        };
        state.send(&event);
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
        let duration_ms = u64::try_from(state.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let event = ProgressEvent {
            kind: EventType::End,
            percent: rounded_percent(state.total, state.total),
            eta_seconds: None,
            message: state.message.clone(),
            duration_ms: Some(duration_ms),
        };
        state.send(&event);
    }

    fn kind(&self) -> ReporterKind {
        ReporterKind::JsonStream
    }
}
