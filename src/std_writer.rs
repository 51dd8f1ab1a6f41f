//! `io::Write` adapter for code that only knows how to write lines
//!
//! Each complete line written becomes one event. Without a forced level the
//! level is taken from the start of the line:
//!
//! | prefix  | level |
//! |---------|-------|
//! | `DEBUG` | debug |
//! | `INFO`  | info  |
//! | `WARN`  | warn  |
//! | `ERROR` | error |
//! | `ERR`   | error |
//!
//! and anything else is logged at info with the line unchanged.
//!
//! ```
//! use std::io::Write;
//! use std::sync::Arc;
//! use rust_structured_logger::{Logger, MemorySink, StdLogWriter};
//!
//! let out = MemorySink::new();
//! let logger = Arc::new(Logger::new(out.sink()));
//! let mut writer = StdLogWriter::new(logger);
//!
//! writeln!(writer, "WARN  cache miss ratio {}", 0.4).unwrap();
//! assert_eq!(out.contents(), "WARN cache miss ratio 0.4\n");
//! ```

use crate::core::{Level, Logger};
use std::io;
use std::sync::Arc;

const PREFIXES: [(&str, Level); 5] = [
    ("DEBUG", Level::DEBUG),
    ("INFO", Level::INFO),
    ("WARN", Level::WARN),
    ("ERROR", Level::ERROR),
    ("ERR", Level::ERROR),
];

/// Turns written lines into log events on a shared [`Logger`].
#[derive(Debug)]
pub struct StdLogWriter {
    logger: Arc<Logger>,
    force_level: Option<Level>,
    pending: Vec<u8>,
}

impl StdLogWriter {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            force_level: None,
            pending: Vec::new(),
        }
    }

    /// Log every line at `level`, leaving the text untouched.
    #[must_use]
    pub fn with_force_level(mut self, level: Level) -> Self {
        self.force_level = Some(level);
        self
    }

    fn emit_line(&self, line: &[u8]) {
        let raw = String::from_utf8_lossy(line);
        let text = raw.strip_suffix('\r').unwrap_or(raw.as_ref());

        let (level, message) = match self.force_level {
            Some(level) => (level, text),
            None => infer_level(text),
        };
        self.logger.log(level, message, std::iter::empty::<&str>());
    }
}

/// Level and remaining message for an unforced line.
fn infer_level(line: &str) -> (Level, &str) {
    PREFIXES
        .iter()
        .find_map(|(prefix, level)| {
            line.strip_prefix(*prefix)
                .map(|rest| (*level, rest.trim()))
        })
        .unwrap_or((Level::INFO, line))
}

impl io::Write for StdLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit_line(&line[..pos]);
        }
        Ok(buf.len())
    }

    /// Emit any partial line, then flush the logger's sink.
    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit_line(&line);
        }
        self.logger
            .flush()
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

impl Drop for StdLogWriter {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit_line(&line);
        }
    }
}
