//! Process-wide default logger
//!
//! The default logger is created on first use: text to stderr, timestamps on.
//! [`set_default`] swaps it; loggers already handed out by
//! [`default_logger`] keep working against the old instance.

use super::{level::Level, logger::Logger, sink::Sink, value::Value};
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};

fn slot() -> &'static RwLock<Arc<Logger>> {
    static DEFAULT: OnceLock<RwLock<Arc<Logger>>> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        let logger = Logger::builder()
            .output(Sink::stderr())
            .report_timestamp(true)
            .build();
        RwLock::new(Arc::new(logger))
    })
}

/// The current default logger.
pub fn default_logger() -> Arc<Logger> {
    Arc::clone(&*slot().read())
}

/// Replace the default logger.
pub fn set_default(logger: Logger) {
    *slot().write() = Arc::new(logger);
}

#[track_caller]
pub fn log<M, I>(level: Level, msg: M, keyvals: I)
where
    M: fmt::Display,
    I: IntoIterator,
    I::Item: Into<Value>,
{
    default_logger().log(level, msg, keyvals);
}

#[track_caller]
pub fn debug<M, I>(msg: M, keyvals: I)
where
    M: fmt::Display,
    I: IntoIterator,
    I::Item: Into<Value>,
{
    default_logger().debug(msg, keyvals);
}

#[track_caller]
pub fn info<M, I>(msg: M, keyvals: I)
where
    M: fmt::Display,
    I: IntoIterator,
    I::Item: Into<Value>,
{
    default_logger().info(msg, keyvals);
}

#[track_caller]
pub fn warn<M, I>(msg: M, keyvals: I)
where
    M: fmt::Display,
    I: IntoIterator,
    I::Item: Into<Value>,
{
    default_logger().warn(msg, keyvals);
}

#[track_caller]
pub fn error<M, I>(msg: M, keyvals: I)
where
    M: fmt::Display,
    I: IntoIterator,
    I::Item: Into<Value>,
{
    default_logger().error(msg, keyvals);
}

/// Log at fatal level through the default logger, then exit.
#[track_caller]
pub fn fatal<M, I>(msg: M, keyvals: I)
where
    M: fmt::Display,
    I: IntoIterator,
    I::Item: Into<Value>,
{
    default_logger().fatal(msg, keyvals);
}

#[track_caller]
pub fn print<M, I>(msg: M, keyvals: I)
where
    M: fmt::Display,
    I: IntoIterator,
    I::Item: Into<Value>,
{
    default_logger().print(msg, keyvals);
}

/// A child of the default logger carrying `keyvals`.
pub fn with<I>(keyvals: I) -> Logger
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    default_logger().with(keyvals)
}
