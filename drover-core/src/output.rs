//! Output handles and terminal capability detection.

use std::fmt;
use std::io::{self, IsTerminal, Write};

use tracing::warn;

use crate::error::Result;

/// Whether `handle` is attached to an interactive terminal.
///
/// Anything that cannot be identified as a terminal (pipes, files, closed
/// descriptors) counts as non-interactive.
pub fn is_interactive<T: IsTerminal>(handle: &T) -> bool {
    handle.is_terminal()
}

/// Destination for progress output plus its terminal capability.
///
/// Defaults to stderr, the diagnostic stream. Progress never goes to stdout,
/// which carries the command result.
pub struct OutputHandle {
    writer: Box<dyn Write + Send>,
    terminal: bool,
}

impl OutputHandle {
    pub fn stderr() -> Self {
        let stderr = io::stderr();
        let terminal = is_interactive(&stderr);
        Self {
            writer: Box::new(stderr),
            terminal,
        }
    }

    /// Wrap an arbitrary writer, declaring its terminal capability explicitly.
    pub fn from_writer<W: Write + Send + 'static>(writer: W, terminal: bool) -> Self {
        Self {
            writer: Box::new(writer),
            terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Write one complete record in a single call and flush it.
    pub fn write_record(&mut self, record: &str) -> Result<()> {
        self.writer.write_all(record.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Like [`write_record`](Self::write_record), but failures are logged and dropped.
    pub(crate) fn emit(&mut self, record: &str) {
        if let Err(e) = self.write_record(record) {
            warn!(error = %e, "Failed to write progress output");
        }
    }
}

impl Default for OutputHandle {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for OutputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputHandle")
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}
