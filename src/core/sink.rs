//! Output sinks
//!
//! A [`Sink`] is a cloneable handle to a byte stream. Child loggers share
//! their parent's sink, and every rendered event reaches it in one
//! `write_all` under the sink's mutex so lines never interleave.

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct Sink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    terminal: bool,
    discard: bool,
}

impl Sink {
    /// Wrap any writer. Writers passed this way are never treated as terminals.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            terminal: false,
            discard: false,
        }
    }

    pub fn stderr() -> Self {
        let terminal = io::stderr().is_terminal();
        Self {
            terminal,
            ..Self::new(io::stderr())
        }
    }

    pub fn stdout() -> Self {
        let terminal = io::stdout().is_terminal();
        Self {
            terminal,
            ..Self::new(io::stdout())
        }
    }

    /// Append to `path`, creating it if needed.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open {}", path.display()),
                    e,
                )
            })?;
        Ok(Self::new(file))
    }

    /// Drops everything. Loggers writing here skip rendering entirely.
    pub fn discard() -> Self {
        Self {
            discard: true,
            ..Self::new(io::sink())
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    #[must_use]
    pub fn is_discard(&self) -> bool {
        self.discard
    }

    /// Write one rendered event.
    pub fn write_event(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(bytes)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }

    /// Whether two handles point at the same stream.
    #[must_use]
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("terminal", &self.terminal)
            .field("discard", &self.discard)
            .finish()
    }
}

/// In-memory sink whose contents can be read back. Handy in tests and for
/// capturing output.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`Sink`] that writes into this buffer.
    pub fn sink(&self) -> Sink {
        Sink::new(self.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Return the contents and clear the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.buf.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
