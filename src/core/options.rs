//! Declarative logger configuration
//!
//! [`Options`] mirrors the builder but can be deserialized, so a logger can be
//! described in a configuration file:
//!
//! ```
//! use rust_structured_logger::{kv, Level, Logger, MemorySink, Options};
//!
//! let options = Options::from_json(
//!     r#"{"level": "debug", "formatter": "logfmt", "fields": [["app", "billing"]]}"#,
//! )
//! .unwrap();
//! assert_eq!(options.level, Level::DEBUG);
//!
//! let out = MemorySink::new();
//! let logger = Logger::with_options(out.sink(), options).unwrap();
//! logger.debug("ready", kv![]);
//! assert_eq!(out.contents(), "level=debug msg=ready app=billing\n");
//! ```

use super::{
    error::{LoggerError, Result},
    event::ReservedKeys,
    level::Level,
    logger::{Logger, LoggerBuilder},
    output_format::OutputFormat,
    sink::Sink,
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};

/// Logger settings. Every field is optional when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub level: Level,
    pub prefix: String,
    pub report_timestamp: bool,
    pub report_caller: bool,
    pub time_format: TimestampFormat,
    pub formatter: OutputFormat,
    /// Inherited fields as key/value pairs.
    pub fields: Vec<(String, String)>,
    /// `None` detects colors from the sink.
    pub colors: Option<bool>,
    /// `None` uses the process-wide keys.
    pub reserved_keys: Option<ReservedKeys>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            prefix: String::new(),
            report_timestamp: false,
            report_caller: false,
            time_format: TimestampFormat::default(),
            formatter: OutputFormat::default(),
            fields: Vec::new(),
            colors: None,
            reserved_keys: None,
        }
    }
}

impl Options {
    /// Parse options from a JSON document and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Options = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject settings that would only fail later, at render time.
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(pattern) = &self.time_format {
            TimestampFormat::custom(pattern.as_str())?;
        }
        if self.level == Level::NO_LEVEL {
            return Err(LoggerError::config(
                "Options",
                "the no-level sentinel cannot be used as a minimum level",
            ));
        }
        if let Some(keys) = &self.reserved_keys {
            let names = [
                &keys.timestamp,
                &keys.level,
                &keys.caller,
                &keys.prefix,
                &keys.message,
            ];
            if names.iter().any(|name| name.is_empty()) {
                return Err(LoggerError::config("Options", "reserved key names cannot be empty"));
            }
        }
        Ok(())
    }

    /// A builder preloaded with these options, writing to `sink`.
    pub fn into_builder(self, sink: Sink) -> LoggerBuilder {
        let mut builder = LoggerBuilder::new()
            .output(sink)
            .level(self.level)
            .prefix(self.prefix)
            .report_timestamp(self.report_timestamp)
            .report_caller(self.report_caller)
            .time_format(self.time_format)
            .formatter(self.formatter)
            .fields(self.fields.into_iter().flat_map(|(k, v)| [k, v]));
        if let Some(colors) = self.colors {
            builder = builder.colors(colors);
        }
        if let Some(keys) = self.reserved_keys {
            builder = builder.reserved_keys(keys);
        }
        builder
    }
}

impl Logger {
    /// Build a logger from declarative [`Options`].
    pub fn with_options(sink: Sink, options: Options) -> Result<Logger> {
        options.validate()?;
        Ok(options.into_builder(sink).build())
    }
}
