//! Log level definitions
//!
//! A [`Level`] is an ordered integer severity. The named levels leave gaps
//! between them so applications can log at their own numeric levels.

use super::error::LoggerError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(i32);

impl Level {
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);
    pub const FATAL: Level = Level(12);

    /// Level of `print` events. Sorts above every real level so it is never
    /// filtered, except by [`Level::OFF`].
    pub const NO_LEVEL: Level = Level(i32::MAX - 1);

    /// Minimum level that disables all output.
    pub const OFF: Level = Level(i32::MAX);

    #[must_use]
    pub const fn new(value: i32) -> Self {
        Level(value)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Lowercase name of a named level, empty for anything else.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self.0 {
            -4 => "debug",
            0 => "info",
            4 => "warn",
            8 => "error",
            12 => "fatal",
            _ => "",
        }
    }

    #[must_use]
    pub const fn is_named(self) -> bool {
        !self.as_str().is_empty()
    }

    /// The five named levels in increasing severity.
    #[must_use]
    pub const fn all() -> [Level; 5] {
        [
            Level::DEBUG,
            Level::INFO,
            Level::WARN,
            Level::ERROR,
            Level::FATAL,
        ]
    }

    /// Parse a level name, case-insensitively.
    ///
    /// Unknown input yields [`Level::INFO`] together with an
    /// [`LoggerError::InvalidLevel`]; callers may ignore the error and keep
    /// the fallback.
    ///
    /// ```
    /// use rust_structured_logger::Level;
    ///
    /// let (level, err) = Level::parse("WARN");
    /// assert_eq!(level, Level::WARN);
    /// assert!(err.is_none());
    ///
    /// let (level, err) = Level::parse("loud");
    /// assert_eq!(level, Level::INFO);
    /// assert!(err.is_some());
    /// ```
    pub fn parse(s: &str) -> (Level, Option<LoggerError>) {
        match s.parse() {
            Ok(level) => (level, None),
            Err(err) => (Level::INFO, Some(err)),
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level(value)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            "" => write!(f, "{}", self.0),
            name => f.write_str(name),
        }
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            "fatal" => Ok(Level::FATAL),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_named() {
            serializer.serialize_str(self.as_str())
        } else {
            serializer.serialize_i32(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = Level;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a level name or an integer level")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Level, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Level, E> {
                i32::try_from(v).map(Level).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Level, E> {
                i32::try_from(v).map(Level).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(Level::default(), Level::INFO);
    }

    #[test]
    fn test_parse_named_levels() {
        assert_eq!(Level::parse("debug").0, Level::DEBUG);
        assert_eq!(Level::parse("Info").0, Level::INFO);
        assert_eq!(Level::parse("WARN").0, Level::WARN);
        assert_eq!(Level::parse("error").0, Level::ERROR);
        assert_eq!(Level::parse("FATAL").0, Level::FATAL);
        assert!(Level::parse("fatal").1.is_none());
    }

    #[test]
    fn test_parse_falls_back_to_info() {
        let (level, err) = Level::parse("WRONG_LEVEL");
        assert_eq!(level, Level::INFO);
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("invalid level: \"WRONG_LEVEL\"".to_string())
        );

        let (level, err) = Level::parse("");
        assert_eq!(level, Level::INFO);
        assert!(err.is_some());
    }

    #[test]
    fn test_warning_alias_is_not_accepted() {
        assert!("warning".parse::<Level>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Level::DEBUG < Level::INFO);
        assert!(Level::INFO < Level::WARN);
        assert!(Level::WARN < Level::ERROR);
        assert!(Level::ERROR < Level::FATAL);
        assert!(Level::FATAL < Level::NO_LEVEL);
        assert!(Level::NO_LEVEL < Level::OFF);
        assert!(Level::new(500) > Level::FATAL);
        assert!(Level::new(2) > Level::INFO && Level::new(2) < Level::WARN);
    }

    #[test]
    fn test_display() {
        assert_eq!(Level::ERROR.to_string(), "error");
        assert_eq!(Level::new(500).to_string(), "500");
        assert_eq!(Level::new(500).as_str(), "");
        assert!(!Level::new(500).is_named());
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&Level::WARN).unwrap(), "\"warn\"");
        assert_eq!(serde_json::to_string(&Level::new(500)).unwrap(), "500");

        let level: Level = serde_json::from_str("\"Error\"").unwrap();
        assert_eq!(level, Level::ERROR);
        let level: Level = serde_json::from_str("-8").unwrap();
        assert_eq!(level, Level::new(-8));
        assert!(serde_json::from_str::<Level>("\"loud\"").is_err());
    }
}
