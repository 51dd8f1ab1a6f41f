//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Level string did not match any named level
    #[error("invalid level: {input:?}")]
    InvalidLevel { input: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error without further context
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create an invalid level error for the given input
    pub fn invalid_level(input: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            input: input.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_level("loud");
        assert!(matches!(err, LoggerError::InvalidLevel { .. }));

        let err = LoggerError::config("TimestampFormat", "bad pattern");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err: LoggerError = std::io::Error::other("disk full").into();
        assert!(matches!(err, LoggerError::IoError(_)));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_level("WRONG_LEVEL");
        assert_eq!(err.to_string(), "invalid level: \"WRONG_LEVEL\"");

        let err = LoggerError::invalid_level("");
        assert_eq!(err.to_string(), "invalid level: \"\"");

        let err = LoggerError::config("TimestampFormat", "unknown specifier");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for TimestampFormat: unknown specifier"
        );

        let err: LoggerError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error: "));
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = LoggerError::io_operation("writing log event", "sink rejected write", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log event"));
        assert!(err.to_string().contains("sink rejected write"));
    }
}
