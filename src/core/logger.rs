//! Main logger implementation
//!
//! Every call runs on the caller's thread: level check, message and lazy
//! value resolution, field assembly, rendering into the logger's own buffer,
//! then one write to the sink. Everything from field assembly on holds the
//! logger's write lock, so events from concurrent callers never interleave.

use super::{
    caller::{short_caller_formatter, Caller, CallerFormatter},
    error::{LoggerError, Result},
    event::{Event, EventSpec, ReservedKeys},
    level::Level,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    sink::Sink,
    styles::Styles,
    timestamp::{local_time_source, TimeSource, Timestamp, TimestampFormat},
    value::Value,
};
use crate::formatters::{FormatContext, Formatter};
use parking_lot::RwLock;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

/// Called by [`Logger::fatal`] after the event is flushed.
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

fn default_exit_hook() -> ExitHook {
    Arc::new(|code| std::process::exit(code))
}

/// Colors are on for terminals, unless running under CI.
pub(crate) fn detect_colors(sink: &Sink) -> bool {
    sink.is_terminal() && std::env::var_os("CI").is_none()
}

#[derive(Clone)]
enum FormatterChoice {
    Builtin(OutputFormat),
    Custom(Arc<dyn Formatter>),
}

impl FormatterChoice {
    fn get(&self) -> &dyn Formatter {
        match self {
            FormatterChoice::Builtin(format) => format.formatter(),
            FormatterChoice::Custom(formatter) => formatter.as_ref(),
        }
    }
}

#[derive(Clone)]
struct State {
    sink: Sink,
    prefix: String,
    time_source: TimeSource,
    time_format: TimestampFormat,
    formatter: FormatterChoice,
    caller_formatter: CallerFormatter,
    report_timestamp: bool,
    report_caller: bool,
    colors: bool,
    styles: Styles,
    keys: ReservedKeys,
    fields: Vec<Value>,
    exit_hook: ExitHook,
    buf: Vec<u8>,
}

impl State {
    fn new(sink: Sink) -> Self {
        Self {
            colors: detect_colors(&sink),
            sink,
            prefix: String::new(),
            time_source: local_time_source(),
            time_format: TimestampFormat::default(),
            formatter: FormatterChoice::Builtin(OutputFormat::default()),
            caller_formatter: short_caller_formatter(),
            report_timestamp: false,
            report_caller: false,
            styles: Styles::default(),
            keys: ReservedKeys::global(),
            fields: Vec::new(),
            exit_hook: default_exit_hook(),
            buf: Vec::with_capacity(256),
        }
    }
}

/// A leveled, structured logger.
///
/// # Example
///
/// ```
/// use rust_structured_logger::{kv, Logger, MemorySink};
///
/// let out = MemorySink::new();
/// let logger = Logger::new(out.sink());
///
/// logger.info("deploy started", kv!["service", "api", "version", "1.2.3"]);
/// assert_eq!(out.contents(), "INFO deploy started service=api version=1.2.3\n");
/// ```
pub struct Logger {
    state: RwLock<State>,
    level: AtomicI32,
    discard: AtomicBool,
    metrics: LoggerMetrics,
}

impl Logger {
    /// A logger writing text to `sink` at [`Level::INFO`], without timestamps
    /// or caller information.
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self::from_state(State::new(sink), Level::INFO)
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn from_state(state: State, level: Level) -> Self {
        let discard = state.sink.is_discard();
        Self {
            state: RwLock::new(state),
            level: AtomicI32::new(level.value()),
            discard: AtomicBool::new(discard),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Whether an event at `level` would be written. [`Level::OFF`] never is.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level != Level::OFF && !self.discard.load(Ordering::Relaxed) && level >= self.level()
    }

    /// Log at `level`, returning any sink write error.
    #[track_caller]
    pub fn try_log<M, I>(&self, level: Level, msg: M, keyvals: I) -> Result<()>
    where
        M: fmt::Display,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.emit(level, Caller::here(), &msg, keyvals)
    }

    #[track_caller]
    pub fn log<M, I>(&self, level: Level, msg: M, keyvals: I)
    where
        M: fmt::Display,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let _ = self.emit(level, Caller::here(), &msg, keyvals);
    }

    #[track_caller]
    pub fn debug<M, I>(&self, msg: M, keyvals: I)
    where
        M: fmt::Display,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let _ = self.emit(Level::DEBUG, Caller::here(), &msg, keyvals);
    }

    #[track_caller]
    pub fn info<M, I>(&self, msg: M, keyvals: I)
    where
        M: fmt::Display,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let _ = self.emit(Level::INFO, Caller::here(), &msg, keyvals);
    }

    #[track_caller]
    pub fn warn<M, I>(&self, msg: M, keyvals: I)
    where
        M: fmt::Display,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let _ = self.emit(Level::WARN, Caller::here(), &msg, keyvals);
    }

    #[track_caller]
    pub fn error<M, I>(&self, msg: M, keyvals: I)
    where
        M: fmt::Display,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let _ = self.emit(Level::ERROR, Caller::here(), &msg, keyvals);
    }

    /// Log at [`Level::FATAL`], flush, then call the exit hook with status 1.
    ///
    /// The default hook terminates the process. The hook runs even when the
    /// fatal level is filtered out.
    #[track_caller]
    pub fn fatal<M, I>(&self, msg: M, keyvals: I)
    where
        M: fmt::Display,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let _ = self.emit(Level::FATAL, Caller::here(), &msg, keyvals);
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        let hook = self.state.read().exit_hook.clone();
        hook(1);
    }

    /// Log without a level. Only [`Level::OFF`] filters these.
    #[track_caller]
    pub fn print<M, I>(&self, msg: M, keyvals: I)
    where
        M: fmt::Display,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let _ = self.emit(Level::NO_LEVEL, Caller::here(), &msg, keyvals);
    }

    fn emit<I>(&self, level: Level, caller: Caller, msg: &dyn fmt::Display, keyvals: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        if !self.enabled(level) {
            self.metrics.record_filtered();
            return Ok(());
        }

        // Rendered before taking the write lock so Display and LogValue
        // impls may log through this logger.
        let message = msg.to_string();
        let call_site: Vec<Value> = keyvals
            .into_iter()
            .map(|v| Into::<Value>::into(v).into_resolved())
            .collect();
        let lazy_inherited = {
            let state = self.state.read();
            if state.fields.iter().any(Value::is_lazy) {
                Some(state.fields.clone())
            } else {
                None
            }
        };
        let inherited_resolved: Option<Vec<Value>> =
            lazy_inherited.map(|fields| fields.into_iter().map(Value::into_resolved).collect());

        let mut guard = self.state.write();
        let state = &mut *guard;

        let time_source = &state.time_source;
        let caller_formatter = &state.caller_formatter;
        let now = || -> Timestamp { time_source() };
        let caller_text = || -> String { caller_formatter(&caller) };

        let Some(event) = Event::build(EventSpec {
            min_level: self.level(),
            level,
            timestamp: state.report_timestamp.then_some(&now as &dyn Fn() -> Timestamp),
            caller: state.report_caller.then_some(&caller_text as &dyn Fn() -> String),
            prefix: &state.prefix,
            message: &message,
            inherited: inherited_resolved.as_deref().unwrap_or(&state.fields),
            call_site,
        }) else {
            self.metrics.record_filtered();
            return Ok(());
        };

        let ctx = FormatContext {
            keys: &state.keys,
            styles: &state.styles,
            colors: state.colors,
            time_format: &state.time_format,
        };
        state.buf.clear();
        state.formatter.get().format(&event, &ctx, &mut state.buf);
        let written = state.sink.write_event(&state.buf);
        state.buf.clear();
        drop(guard);

        match written {
            Ok(()) => {
                self.metrics.record_logged();
                Ok(())
            }
            Err(e) => {
                self.report_write_error(&e);
                Err(LoggerError::io_operation(
                    "writing log event",
                    "sink rejected write",
                    e,
                ))
            }
        }
    }

    fn report_write_error(&self, err: &io::Error) {
        let failures = self.metrics.record_write_error();

        // Alert on first failure and periodically thereafter
        if failures == 0 || (failures + 1) % 1000 == 0 {
            eprintln!(
                "[LOGGER ERROR] Failed to write log event ({} failures so far): {}",
                failures + 1,
                err
            );
        }
    }

    /// A child logger with `keyvals` appended to the inherited fields.
    ///
    /// The child starts from a copy of this logger's configuration and has
    /// its own lock, buffer and metrics. Only the sink is shared.
    #[must_use]
    pub fn with<I>(&self, keyvals: I) -> Logger
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut state = self.child_state();
        state.fields.extend(keyvals.into_iter().map(Into::into));
        Self::from_state(state, self.level())
    }

    /// A child logger with a different prefix.
    #[must_use]
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Logger {
        let mut state = self.child_state();
        state.prefix = prefix.into();
        Self::from_state(state, self.level())
    }

    fn child_state(&self) -> State {
        let mut state = self.state.read().clone();
        state.buf = Vec::with_capacity(256);
        state
    }

    pub fn level(&self) -> Level {
        Level::new(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.level.store(level.value(), Ordering::Relaxed);
    }

    pub fn prefix(&self) -> String {
        self.state.read().prefix.clone()
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.state.write().prefix = prefix.into();
    }

    /// Clock used for timestamps, e.g. [`now_utc`](crate::now_utc).
    pub fn set_time_function<F>(&self, f: F)
    where
        F: Fn() -> Timestamp + Send + Sync + 'static,
    {
        self.state.write().time_source = Arc::new(f);
    }

    pub fn time_format(&self) -> TimestampFormat {
        self.state.read().time_format.clone()
    }

    pub fn set_time_format(&self, format: TimestampFormat) {
        self.state.write().time_format = format;
    }

    /// Built-in format in use, or `None` when a custom formatter is set.
    pub fn formatter(&self) -> Option<OutputFormat> {
        match self.state.read().formatter {
            FormatterChoice::Builtin(format) => Some(format),
            FormatterChoice::Custom(_) => None,
        }
    }

    pub fn set_formatter(&self, format: OutputFormat) {
        self.state.write().formatter = FormatterChoice::Builtin(format);
    }

    pub fn set_custom_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.state.write().formatter = FormatterChoice::Custom(formatter);
    }

    pub fn set_caller_formatter(&self, formatter: CallerFormatter) {
        self.state.write().caller_formatter = formatter;
    }

    pub fn report_timestamp(&self) -> bool {
        self.state.read().report_timestamp
    }

    pub fn set_report_timestamp(&self, report: bool) {
        self.state.write().report_timestamp = report;
    }

    pub fn report_caller(&self) -> bool {
        self.state.read().report_caller
    }

    pub fn set_report_caller(&self, report: bool) {
        self.state.write().report_caller = report;
    }

    pub fn colors(&self) -> bool {
        self.state.read().colors
    }

    pub fn set_colors(&self, colors: bool) {
        self.state.write().colors = colors;
    }

    pub fn styles(&self) -> Styles {
        self.state.read().styles.clone()
    }

    pub fn set_styles(&self, styles: Styles) {
        self.state.write().styles = styles;
    }

    pub fn reserved_keys(&self) -> ReservedKeys {
        self.state.read().keys.clone()
    }

    pub fn set_reserved_keys(&self, keys: ReservedKeys) {
        self.state.write().keys = keys;
    }

    /// Replace the sink. Color detection is redone for the new sink.
    pub fn set_output(&self, sink: Sink) {
        let mut state = self.state.write();
        self.discard.store(sink.is_discard(), Ordering::Relaxed);
        state.colors = detect_colors(&sink);
        state.sink = sink;
    }

    pub fn output(&self) -> Sink {
        self.state.read().sink.clone()
    }

    pub fn set_exit_hook<F>(&self, hook: F)
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.state.write().exit_hook = Arc::new(hook);
    }

    /// Inherited fields, as alternating keys and values.
    pub fn fields(&self) -> Vec<Value> {
        self.state.read().fields.clone()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_structured_logger::{kv, Logger, Sink};
    ///
    /// let logger = Logger::new(Sink::new(std::io::sink()));
    /// logger.info("hello", kv![]);
    /// logger.debug("filtered", kv![]);
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.total_logged(), 1);
    /// assert_eq!(metrics.filtered_count(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.output().flush()?;
        Ok(())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Sink::stderr())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("prefix", &state.prefix)
            .field("formatter", &state.formatter.get().name())
            .field("report_timestamp", &state.report_timestamp)
            .field("report_caller", &state.report_caller)
            .field("fields", &state.fields.len())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_structured_logger::prelude::*;
///
/// let out = MemorySink::new();
/// let logger = Logger::builder()
///     .level(Level::DEBUG)
///     .output(out.sink())
///     .formatter(OutputFormat::Logfmt)
///     .prefix("api")
///     .fields(kv!["region", "eu-west-1"])
///     .build();
///
/// logger.debug("ready", kv![]);
/// assert_eq!(out.contents(), "level=debug prefix=api msg=ready region=eu-west-1\n");
/// ```
pub struct LoggerBuilder {
    level: Level,
    state: State,
    colors: Option<bool>,
}

impl LoggerBuilder {
    /// Create a new builder writing to stderr
    pub fn new() -> Self {
        Self {
            level: Level::INFO,
            state: State::new(Sink::stderr()),
            colors: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, sink: Sink) -> Self {
        self.state.sink = sink;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.state.prefix = prefix.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, format: OutputFormat) -> Self {
        self.state.formatter = FormatterChoice::Builtin(format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn custom_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.state.formatter = FormatterChoice::Custom(formatter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_timestamp(mut self, report: bool) -> Self {
        self.state.report_timestamp = report;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, report: bool) -> Self {
        self.state.report_caller = report;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.state.time_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_function<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Timestamp + Send + Sync + 'static,
    {
        self.state.time_source = Arc::new(f);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller_formatter(mut self, formatter: CallerFormatter) -> Self {
        self.state.caller_formatter = formatter;
        self
    }

    /// Force colors on or off instead of detecting them from the sink
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = Some(colors);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn styles(mut self, styles: Styles) -> Self {
        self.state.styles = styles;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn reserved_keys(mut self, keys: ReservedKeys) -> Self {
        self.state.keys = keys;
        self
    }

    /// Inherited fields, as alternating keys and values
    #[must_use = "builder methods return a new value"]
    pub fn fields<I>(mut self, keyvals: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.state.fields.extend(keyvals.into_iter().map(Into::into));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.state.exit_hook = Arc::new(hook);
        self
    }

    pub fn build(self) -> Logger {
        let mut state = self.state;
        state.colors = self.colors.unwrap_or_else(|| detect_colors(&state.sink));
        Logger::from_state(state, self.level)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
