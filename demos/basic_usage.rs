//! Basic logger usage example
//!
//! Demonstrates level methods, the minimum level, timestamps, caller
//! reporting and child loggers.
//!
//! Run with: cargo run --example basic_usage

use rust_structured_logger::prelude::*;
use rust_structured_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .output(Sink::stdout())
        .level(Level::DEBUG)
        .report_timestamp(true)
        .build();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message", kv![]);
    logger.info("This is an info message", kv![]);
    logger.warn("This is a warning message", kv![]);
    logger.error("This is an error message", kv![]);
    logger.print("This message has no level", kv![]);

    println!("\n2. Logging with a higher minimum level:");
    logger.set_level(Level::INFO);
    println!("   Minimum level set to INFO - debug won't show:");
    logger.debug("Debug message (hidden)", kv![]);
    logger.info("Info message (visible)", kv![]);

    println!("\n3. Fields, prefixes and children:");
    let db = logger.with_prefix("db").with(kv!["pool", "primary"]);
    db.info("connected", kv!["host", "10.0.0.5", "port", 5432]);
    db.warn("slow query", kv!["ms", 1840, "sql", "SELECT * FROM orders"]);

    println!("\n4. Caller reporting and format macros:");
    logger.set_report_caller(true);
    let user = "ada";
    info!(logger, "user {} logged in", user; "attempt", 1);
    warn!(logger, "quota at {}%", 91);

    println!("\n5. Parsing levels from configuration:");
    let (level, err) = Level::parse("verbose");
    println!("   parsed {:?} with error {:?}", level, err.map(|e| e.to_string()));

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
