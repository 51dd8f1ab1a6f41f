//! # Rust Structured Logger
//!
//! A leveled, structured logger. Each call carries a message and alternating
//! key/value fields; the logger gates it by level, assembles the field list
//! and renders it as text, JSON or logfmt in a single write to its sink.
//!
//! ## Features
//!
//! - **Three renderers**: colored human-readable text, JSON lines, logfmt
//! - **Typed values**: errors, lazy values, display and serde structural dumps
//! - **Child loggers**: inherited fields and prefixes without shared mutable state
//! - **Cheap when disabled**: no clock read, caller lookup or allocation
//!
//! ```
//! use rust_structured_logger::prelude::*;
//!
//! let out = MemorySink::new();
//! let logger = Logger::new(out.sink());
//! let requests = logger.with(kv!["component", "http"]);
//!
//! requests.info("request served", kv!["status", 200, "path", "/health"]);
//! requests.debug("not shown", kv![]);
//!
//! assert_eq!(
//!     out.contents(),
//!     "INFO request served component=http status=200 path=/health\n"
//! );
//! ```

pub mod core;
pub mod formatters;
pub mod macros;
pub mod std_writer;

pub use crate::core::global;

pub mod prelude {
    pub use crate::core::{
        group, Field, Level, LogValue, Logger, LoggerBuilder, LoggerError, MemorySink, Options,
        OutputFormat, Result, Sink, TimestampFormat, Value,
    };
    pub use crate::kv;
}

pub use crate::core::{
    group, long_caller_formatter, now_local, now_utc, short_caller_formatter, Caller,
    CallerFormatter, Color, Event, EventSpec, ExitHook, Field, FieldKey, Level, LevelStyle,
    LogValue, Logger, LoggerBuilder, LoggerError, LoggerMetrics, MemorySink, Options,
    OutputFormat, ReservedKeys, Result, Sink, Style, Styles, TimeSource, Timestamp,
    TimestampFormat, Value, MISSING_VALUE,
};
pub use formatters::{FormatContext, Formatter, JsonFormatter, LogfmtFormatter, TextFormatter};
pub use std_writer::StdLogWriter;
