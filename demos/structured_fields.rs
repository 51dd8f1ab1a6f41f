//! Structured values example
//!
//! Shows how errors, lazy values, display values, serde structures and
//! groups are rendered.
//!
//! Run with: cargo run --example structured_fields

use rust_structured_logger::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
struct Order {
    id: u64,
    items: Vec<&'static str>,
    total: f64,
}

/// Expensive to compute, so only resolved when the event is written.
struct CacheStats;

impl LogValue for CacheStats {
    fn log_value(&self) -> Value {
        group([Field::new("hits", 1520), Field::new("misses", 37)])
    }
}

fn main() -> Result<()> {
    println!("=== Rust Structured Logger - Structured Fields Example ===\n");

    let logger = Logger::builder().output(Sink::stdout()).build();

    let order = Order {
        id: 1042,
        items: vec!["tea", "scones"],
        total: 12.5,
    };
    logger.info("order placed", kv!["order", Value::structural(&order)]);

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    logger.error("startup failed", kv!["err", Value::error(&err)]);

    let addr = std::net::Ipv4Addr::new(192, 168, 1, 20);
    logger.info("peer", kv!["addr", Value::display(&addr)]);

    let mut limits = HashMap::new();
    limits.insert("cpu", 2);
    limits.insert("memory_gb", 4);
    logger.info("limits", kv!["limits", limits]);

    logger.info("cache", kv!["stats", Value::from_log_value(CacheStats)]);
    logger.debug("never resolved", kv!["stats", Value::from_log_value(CacheStats)]);

    logger.warn("stack trace", kv!["trace", "at main.rs:10\nat lib.rs:42"]);
    logger.info("odd fields", kv!["key_without_value"]);

    println!("\nSame events as JSON:");
    logger.set_formatter(OutputFormat::Json);
    logger.info("order placed", kv!["order", Value::structural(&order)]);
    logger.info("cache", kv!["stats", Value::from_log_value(CacheStats)]);
    logger.info("payload", kv!["raw", Value::bytes(b"\x00\x01binary".to_vec())]);

    logger.flush()?;
    Ok(())
}
