//! Criterion benchmarks for rust_structured_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_structured_logger::prelude::*;
use rust_structured_logger::{info, Event, EventSpec, FieldKey};
use rust_structured_logger::{FormatContext, ReservedKeys, Styles};
use serde::Serialize;
use std::sync::Arc;

fn null_logger(format: OutputFormat) -> Logger {
    Logger::builder()
        .output(Sink::new(std::io::sink()))
        .formatter(format)
        .colors(false)
        .build()
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("new", |b| {
        b.iter(|| {
            let logger = Logger::new(Sink::new(std::io::sink()));
            black_box(logger)
        });
    });

    let parent = null_logger(OutputFormat::Text);
    group.bench_function("child_with_fields", |b| {
        b.iter(|| {
            let child = parent.with(kv!["request_id", black_box(42), "user", "ada"]);
            black_box(child)
        });
    });

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("formats");
    group.throughput(Throughput::Elements(1));

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Logfmt] {
        let logger = null_logger(format);
        logger.set_report_timestamp(true);
        group.bench_function(format.as_str(), |b| {
            b.iter(|| {
                logger.info(
                    black_box("request served"),
                    kv!["method", "GET", "path", "/api/users", "status", 200, "ms", 12.5],
                );
            });
        });
    }

    group.finish();
}

fn bench_formatter_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatter_direct");
    group.throughput(Throughput::Elements(1));

    let event = Event::from_fields(vec![
        (FieldKey::Level, Value::Level(Level::INFO)),
        (FieldKey::Message, Value::from("request served")),
        (FieldKey::User(Value::from("path")), Value::from("/api/users")),
        (FieldKey::User(Value::from("note")), Value::from("needs \"quoting\"")),
        (FieldKey::User(Value::from("trace")), Value::from("line one\nline two")),
    ]);
    let keys = ReservedKeys::default();
    let styles = Styles::default();
    let time_format = TimestampFormat::default();
    let ctx = FormatContext {
        keys: &keys,
        styles: &styles,
        colors: false,
        time_format: &time_format,
    };

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Logfmt] {
        let mut buf = Vec::with_capacity(256);
        group.bench_function(format.as_str(), |b| {
            b.iter(|| {
                buf.clear();
                format.format(black_box(&event), &ctx, &mut buf);
                black_box(buf.len())
            });
        });
    }

    group.finish();
}

// ============================================================================
// Value Benchmarks
// ============================================================================

fn bench_structural_values(c: &mut Criterion) {
    #[derive(Serialize)]
    struct Request {
        method: &'static str,
        path: &'static str,
        headers: Vec<(&'static str, &'static str)>,
    }

    let mut group = c.benchmark_group("values");
    let request = Request {
        method: "GET",
        path: "/api/users",
        headers: vec![("accept", "json"), ("host", "example.org")],
    };

    group.bench_function("structural", |b| {
        b.iter(|| black_box(Value::structural(black_box(&request))));
    });

    let value = Value::structural(&request);
    group.bench_function("display_dump", |b| {
        b.iter(|| black_box(value.to_string()));
    });

    group.finish();
}

fn bench_event_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_build");
    let inherited = kv!["service", "api", "region", "eu"];

    group.bench_function("enabled", |b| {
        b.iter(|| {
            let event = Event::build(EventSpec {
                min_level: Level::INFO,
                level: Level::INFO,
                timestamp: None,
                caller: None,
                prefix: "",
                message: "hello",
                inherited: &inherited,
                call_site: kv!["k", 1],
            });
            black_box(event)
        });
    });

    group.finish();
}

// ============================================================================
// Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(OutputFormat::Text);
    logger.set_level(Level::WARN);

    group.bench_function("below_threshold_method", |b| {
        b.iter(|| {
            logger.debug(black_box("This should be filtered"), kv!["k", 1]);
        });
    });

    group.bench_function("below_threshold_macro", |b| {
        b.iter(|| {
            info!(logger, "filtered {}", black_box(1); "k", 1);
        });
    });

    group.bench_function("above_threshold", |b| {
        b.iter(|| {
            logger.error(black_box("This should be logged"), kv![]);
        });
    });

    group.finish();
}

// ============================================================================
// Concurrency Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let logger = Arc::new(null_logger(OutputFormat::Json));

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        for i in 0..100 {
                            logger.info(black_box("Concurrent message"), kv!["t", t, "i", i]);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_logger_creation,
    bench_formats,
    bench_formatter_direct,
    bench_structural_values,
    bench_event_build,
    bench_level_filtering,
    bench_concurrent_logging
);

criterion_main!(benches);
