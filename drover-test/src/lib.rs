// Integration test utilities and fixtures for Drover.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use drover_core::output::OutputHandle;

/// Writer that keeps every `write` call as a separate record.
///
/// Renderers emit each line with a single `write_all`, so a record that
/// holds less (or more) than one line means output was torn or interleaved.
#[derive(Debug, Clone, Default)]
pub struct CaptureWriter {
    records: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl CaptureWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// An output handle writing into this capture.
    pub fn handle(&self, terminal: bool) -> OutputHandle {
        OutputHandle::from_writer(self.clone(), terminal)
    }

    pub fn records(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Whether `record` is one complete in-place redraw (`\r ... ESC[K`),
/// optionally terminated by the final newline.
pub fn is_whole_redraw(record: &str) -> bool {
    let body = record.strip_suffix('\n').unwrap_or(record);
    body.starts_with('\r')
        && body.ends_with("\x1b[K")
        && body.matches('\r').count() == 1
        && !body.contains('\n')
}

/// Whether `record` is exactly one newline-terminated line.
pub fn is_whole_line(record: &str) -> bool {
    record.ends_with('\n') && record.matches('\n').count() == 1 && !record.contains('\r')
}
