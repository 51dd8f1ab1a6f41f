//! Timestamp formatting utilities
//!
//! Provides the timestamp layouts a logger can render and the pluggable
//! clock that produces event times.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;

/// Event time. Carries its UTC offset so local and UTC clocks format alike.
pub type Timestamp = DateTime<FixedOffset>;

/// Clock used to stamp events.
pub type TimeSource = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// Current local time.
pub fn now_local() -> Timestamp {
    Local::now().fixed_offset()
}

/// Current UTC time.
pub fn now_utc() -> Timestamp {
    Utc::now().fixed_offset()
}

pub(crate) fn local_time_source() -> TimeSource {
    Arc::new(now_local)
}

/// Timestamp layout options
///
/// # Examples
///
/// ```
/// use rust_structured_logger::TimestampFormat;
/// use chrono::{FixedOffset, TimeZone};
///
/// let t = FixedOffset::east_opt(0).unwrap()
///     .with_ymd_and_hms(2025, 1, 8, 14, 5, 9).unwrap();
/// assert_eq!(TimestampFormat::DateTime.format(&t), "2025/01/08 14:05:09");
/// assert_eq!(TimestampFormat::Kitchen.format(&t), "2:05PM");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025/01/08 10:30:45`
    #[default]
    DateTime,

    /// `10:30AM`
    Kitchen,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 with offset: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime pattern. Prefer [`TimestampFormat::custom`], which
    /// checks the pattern up front.
    Custom(String),
}

impl TimestampFormat {
    /// Validate a strftime pattern and wrap it.
    pub fn custom(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "TimestampFormat",
                format!("invalid strftime pattern {:?}", pattern),
            ));
        }
        Ok(TimestampFormat::Custom(pattern))
    }

    /// Render a timestamp. The ISO 8601 layouts are rendered in UTC, the rest
    /// in the timestamp's own offset. An unusable custom pattern falls back to
    /// RFC 3339 rather than failing.
    #[must_use]
    pub fn format(&self, t: &Timestamp) -> String {
        match self {
            TimestampFormat::DateTime => t.format("%Y/%m/%d %H:%M:%S").to_string(),
            TimestampFormat::Kitchen => t.format("%-I:%M%p").to_string(),
            TimestampFormat::Iso8601 => t
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            TimestampFormat::Iso8601Micros => t
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.6fZ")
                .to_string(),
            TimestampFormat::Rfc3339 => t.to_rfc3339(),
            TimestampFormat::Unix => t.timestamp().to_string(),
            TimestampFormat::UnixMillis => t.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => t.timestamp_micros().to_string(),
            TimestampFormat::Custom(pattern) => {
                let mut out = String::new();
                match write!(out, "{}", t.format(pattern)) {
                    Ok(()) => out,
                    Err(_) => t.to_rfc3339(),
                }
            }
        }
    }

    /// Numeric Unix value for the numeric layouts.
    #[must_use]
    pub fn unix_value(&self, t: &Timestamp) -> Option<i64> {
        match self {
            TimestampFormat::Unix => Some(t.timestamp()),
            TimestampFormat::UnixMillis => Some(t.timestamp_millis()),
            TimestampFormat::UnixMicros => Some(t.timestamp_micros()),
            _ => None,
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros
        )
    }
}
