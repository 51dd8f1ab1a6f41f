//! Output format selection
//!
//! - Text: Human-readable format (default)
//! - Json: One JSON object per line
//! - Logfmt: Key-value format compatible with log aggregation tools

use super::event::Event;
use crate::formatters::{FormatContext, Formatter, JsonFormatter, LogfmtFormatter, TextFormatter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::LoggerError;

/// Output format for log events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Example: `2025/01/08 10:30:45 INFO Request processed status=200`
    #[default]
    Text,

    /// Example: `{"time":"2025/01/08 10:30:45","level":"info","msg":"Request processed"}`
    Json,

    /// Example: `time="2025/01/08 10:30:45" level=info msg="Request processed"`
    Logfmt,
}

impl OutputFormat {
    /// The formatter implementing this format.
    pub fn formatter(self) -> &'static dyn Formatter {
        match self {
            OutputFormat::Text => &TextFormatter,
            OutputFormat::Json => &JsonFormatter,
            OutputFormat::Logfmt => &LogfmtFormatter,
        }
    }

    /// Render an event in this format, appending to `buf`.
    pub fn format(self, event: &Event, ctx: &FormatContext<'_>, buf: &mut Vec<u8>) {
        self.formatter().format(event, ctx, buf);
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Logfmt => "logfmt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "logfmt" => Ok(OutputFormat::Logfmt),
            _ => Err(LoggerError::config(
                "OutputFormat",
                format!("unknown format {:?}", s),
            )),
        }
    }
}
