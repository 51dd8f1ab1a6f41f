//! Core logger types and traits

pub mod caller;
pub mod error;
pub mod event;
pub mod global;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod output_format;
pub mod sink;
pub mod styles;
pub mod timestamp;
pub mod value;
mod value_ser;

pub use caller::{long_caller_formatter, short_caller_formatter, Caller, CallerFormatter};
pub use error::{LoggerError, Result};
pub use event::{Event, EventSpec, FieldKey, ReservedKeys};
pub use level::Level;
pub use logger::{ExitHook, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use options::Options;
pub use output_format::OutputFormat;
pub use sink::{MemorySink, Sink};
pub use styles::{Color, LevelStyle, Style, Styles};
pub use timestamp::{now_local, now_utc, TimeSource, Timestamp, TimestampFormat};
pub use value::{group, Field, LogValue, Value, MISSING_VALUE};
