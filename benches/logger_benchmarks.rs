//! Criterion benchmarks for async_event_log

use async_event_log::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

/// Backend that accepts everything at or above `min_level` and writes nothing
struct NullBackend {
    min_level: LogLevel,
}

impl Backend for NullBackend {
    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, event: &LogEvent) -> async_event_log::Result<()> {
        black_box(event);
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn null_logger(min_level: LogLevel) -> AsyncLogger<NullBackend> {
    AsyncLogger::new(NullBackend { min_level }).expect("Failed to build logger")
}

// ============================================================================
// Emit Path Benchmarks
// ============================================================================

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(LogLevel::Info);

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("debug_disabled", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    group.bench_function("signal", |b| {
        b.iter(|| logger.signal(LogLevel::Warn, black_box(42), "Signal message"));
    });

    group.bench_function("info_fmt", |b| {
        b.iter(|| {
            logger
                .info_fmt(black_box("{0} handled in {1} ms"), &[&"request", &17])
                .expect("format failed")
        });
    });

    group.bench_function("with_properties", |b| {
        b.iter(|| {
            let props = Properties::new().with("user_id", 42).with("route", "/api");
            logger.emit(LogLevel::Info, Some("request".into()), None, Some(props), None)
        });
    });

    group.finish();
    logger.close().expect("close failed");
}

// ============================================================================
// Concurrent Producer Benchmarks
// ============================================================================

fn bench_concurrent_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_emit");
    group.throughput(Throughput::Elements(4 * 1_000));

    let logger = Arc::new(null_logger(LogLevel::Debug));

    group.bench_function("4_threads_x_1000", |b| {
        b.iter(|| {
            std::thread::scope(|s| {
                for _ in 0..4 {
                    let logger = &logger;
                    s.spawn(move || {
                        for _ in 0..1_000 {
                            logger.info(black_box("Concurrent message"));
                        }
                    });
                }
            });
        });
    });

    group.finish();
    logger.close().expect("close failed");
}

// ============================================================================
// Close / Final Drain Benchmarks
// ============================================================================

fn bench_close_with_backlog(c: &mut Criterion) {
    let mut group = c.benchmark_group("close");

    for backlog in [100usize, 10_000] {
        group.throughput(Throughput::Elements(backlog as u64));
        group.bench_function(format!("backlog_{}", backlog), |b| {
            b.iter_batched(
                || {
                    let logger = AsyncLogger::<NullBackend>::builder()
                        .drain_delay(Duration::from_secs(60))
                        .build(NullBackend {
                            min_level: LogLevel::Debug,
                        })
                        .expect("Failed to build logger");
                    for i in 0..backlog {
                        logger.info(format!("queued {}", i));
                    }
                    logger
                },
                |logger| logger.close().expect("close failed"),
                BatchSize::PerIteration,
            );
        });
    }

    group.finish();
}

fn bench_event_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("plain", |b| {
        b.iter(|| LogEvent::new("bench", LogLevel::Info, Some(black_box("message").to_string())));
    });

    group.bench_function("with_error", |b| {
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "config missing");
        b.iter(|| {
            LogEvent::new("bench", LogLevel::Error, None)
                .with_event_id(7)
                .with_error(black_box(&error))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_emit,
    bench_concurrent_emit,
    bench_close_with_backlog,
    bench_event_creation,
);
criterion_main!(benches);
