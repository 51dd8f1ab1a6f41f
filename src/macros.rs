//! Logging macros with format-string messages.
//!
//! The level macros check [`Logger::enabled`](crate::Logger::enabled) first,
//! so neither the message nor the fields are built for a filtered level.
//! Fields follow a `;` as alternating keys and values.
//!
//! # Examples
//!
//! ```
//! use rust_structured_logger::{info, warn, Logger, MemorySink};
//!
//! let out = MemorySink::new();
//! let logger = Logger::new(out.sink());
//!
//! info!(logger, "Server started");
//! let port = 8080;
//! info!(logger, "listening on {}", port; "tls", false);
//! warn!(logger, "slow request"; "path", "/api", "ms", 950);
//!
//! assert_eq!(
//!     out.contents(),
//!     "INFO Server started\nINFO listening on 8080 tls=false\nWARN slow request path=/api ms=950\n"
//! );
//! ```

/// Build a call-site field list from alternating keys and values.
///
/// ```
/// use rust_structured_logger::{kv, Value};
///
/// let fields = kv!["user", "ada", "id", 7];
/// assert_eq!(fields, vec![Value::from("user"), Value::from("ada"), Value::from("id"), Value::from(7)]);
/// assert!(kv![].is_empty());
/// ```
#[macro_export]
macro_rules! kv {
    ($($x:expr),* $(,)?) => {{
        let fields: ::std::vec::Vec<$crate::Value> = ::std::vec![$($crate::Value::from($x)),*];
        fields
    }};
}

/// Log at an explicit level.
///
/// ```
/// # use rust_structured_logger::{Level, Logger, MemorySink};
/// use rust_structured_logger::log;
/// # let out = MemorySink::new();
/// # let logger = Logger::new(out.sink());
/// log!(logger, Level::ERROR, "Error code: {}", 500);
/// log!(logger, Level::new(2), "between info and warn"; "custom", true);
/// # assert_eq!(out.contents(), "ERRO Error code: 500\nbetween info and warn custom=true\n");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* $(,)? ; $($kv:expr),* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, ::std::format_args!($fmt $(, $arg)*), $crate::kv![$($kv),*]);
        }
    }};
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $level, $fmt $(, $arg)*;)
    };
}

/// Log a debug-level message.
///
/// ```
/// # use rust_structured_logger::{Level, Logger, MemorySink};
/// use rust_structured_logger::debug;
/// # let out = MemorySink::new();
/// # let logger = Logger::new(out.sink());
/// logger.set_level(Level::DEBUG);
/// debug!(logger, "Counter value: {}", 10);
/// # assert_eq!(out.contents(), "DEBU Counter value: 10\n");
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::WARN, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ERROR, $($arg)+)
    };
}

/// Log a fatal-level message and call the logger's exit hook.
///
/// Unlike the other level macros this always reaches the logger, since the
/// exit hook runs whether or not the event is written.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)? ; $($kv:expr),* $(,)?) => {
        $logger.fatal(::std::format_args!($fmt $(, $arg)*), $crate::kv![$($kv),*])
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::fatal!($logger, $fmt $(, $arg)*;)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::sink::MemorySink;
    use crate::core::value::{LogValue, Value};
    use crate::core::{Level, Logger};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn logger() -> (Logger, MemorySink) {
        let out = MemorySink::new();
        (Logger::new(out.sink()), out)
    }

    #[test]
    fn test_log_macro() {
        let (logger, out) = logger();
        log!(logger, Level::INFO, "Test message");
        log!(logger, Level::INFO, "Formatted: {}", 42);
        log!(logger, Level::WARN, "with fields"; "a", 1, "b");
        assert_eq!(
            out.contents(),
            "INFO Test message\nINFO Formatted: 42\nWARN with fields a=1 b=\"missing value\"\n"
        );
    }

    #[test]
    fn test_level_macros() {
        let (logger, out) = logger();
        logger.set_level(Level::DEBUG);
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500; "fatal", false);
        assert_eq!(
            out.contents(),
            "DEBU Count: 5\nINFO Items: 100\nWARN Retry 1 of 3\nERRO Code: 500 fatal=false\n"
        );
    }

    #[test]
    fn test_fatal_macro() {
        let (logger, out) = logger();
        let exits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&exits);
        logger.set_exit_hook(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        fatal!(logger, "Critical failure: {}", "system");
        logger.set_level(Level::OFF);
        fatal!(logger, "filtered"; "still", "exits");
        assert_eq!(out.contents(), "FATA Critical failure: system\n");
        assert_eq!(exits.load(Ordering::SeqCst), 2);
    }

    struct Counted(Arc<AtomicUsize>);

    impl LogValue for Counted {
        fn log_value(&self) -> Value {
            self.0.fetch_add(1, Ordering::SeqCst);
            Value::from("counted")
        }
    }

    #[test]
    fn test_filtered_macro_builds_nothing() {
        let (logger, out) = logger();
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let make = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "expensive"
        };

        debug!(logger, "skipped {}", make(); "k", make());
        assert_eq!(built.load(Ordering::SeqCst), 0);
        assert_eq!(out.contents(), "");

        let resolved = Arc::new(AtomicUsize::new(0));
        info!(logger, "lazy"; "v", Value::from_log_value(Counted(Arc::clone(&resolved))));
        assert_eq!(out.contents(), "INFO lazy v=counted\n");
        assert_eq!(resolved.load(Ordering::SeqCst), 1);
    }
}
