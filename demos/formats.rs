//! Output formats example
//!
//! Logs the same events as text, JSON and logfmt, and shows how reserved key
//! names and time formats change the output.
//!
//! Run with: cargo run --example formats

use rust_structured_logger::prelude::*;
use rust_structured_logger::{now_utc, ReservedKeys};

fn emit(logger: &Logger) {
    logger.info("request served", kv!["method", "GET", "path", "/api/users", "status", 200]);
    logger.warn("retrying", kv!["attempt", 2, "reason", "connection reset"]);
}

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Output Formats Example ===\n");

    let logger = Logger::builder()
        .output(Sink::stdout())
        .report_timestamp(true)
        .time_function(now_utc)
        .prefix("gateway")
        .build();

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Logfmt] {
        println!("{}:", format);
        logger.set_formatter(format);
        emit(&logger);
        println!();
    }

    println!("JSON with ISO 8601 time and short keys:");
    logger.set_formatter(OutputFormat::Json);
    logger.set_time_format(TimestampFormat::Iso8601);
    logger.set_reserved_keys(ReservedKeys {
        timestamp: "ts".to_string(),
        level: "lvl".to_string(),
        ..ReservedKeys::default()
    });
    emit(&logger);

    println!("\nlogfmt with Unix time and a custom layout:");
    logger.set_formatter(OutputFormat::Logfmt);
    logger.set_time_format(TimestampFormat::Unix);
    emit(&logger);
    logger.set_time_format(TimestampFormat::custom("%H:%M:%S%.3f")?);
    emit(&logger);

    logger.flush()?;
    Ok(())
}
