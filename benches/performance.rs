//! Performance benchmarks for the access checker
//!
//! Covers the hot paths that run per attempt or per result: size parsing,
//! payload hashing, one full codec exchange over an in-memory stream, and
//! summary aggregation.

use access_checker::{
    cli::Cli,
    config::{validate_test, ConfigParser},
    error::AttemptError,
    models::{AttemptResult, TestDefinition},
    protocol::{self, digest},
    size::parse_size,
    stats::RunSummary,
};
use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Create sample attempt results with a 10% failure rate
fn create_sample_results(count: usize) -> Vec<AttemptResult> {
    (0..count)
        .map(|i| {
            let test = format!("test-{}", i % 5);
            let host = format!("10.0.0.{}:9000", i % 3);
            let attempt = (i % 10) as u32 + 1;
            if i % 10 == 0 {
                AttemptResult::failure(&test, &host, attempt, AttemptError::Timeout(Duration::from_secs(10)))
            } else {
                AttemptResult::success(
                    &test,
                    &host,
                    attempt,
                    Duration::from_millis(10 + i as u64 % 90),
                    1024 * 1024,
                )
            }
        })
        .collect()
}

/// Benchmark size specification parsing
fn benchmark_size_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("size_parsing");

    group.bench_function("parse_valid_sizes", |b| {
        let specs = ["1KB", "512KB", "1MB", "16MB", "1024", "100B"];
        b.iter(|| {
            for spec in specs {
                black_box(parse_size(black_box(spec)).ok());
            }
        });
    });

    group.bench_function("reject_invalid_sizes", |b| {
        let specs = ["abc", "17MB", "1GB", "-1KB", ""];
        b.iter(|| {
            for spec in specs {
                black_box(parse_size(black_box(spec)).err());
            }
        });
    });

    group.bench_function("validate_test", |b| {
        let test = TestDefinition::new("bench", "download", 0, "16MB").with_timeout("5s");
        b.iter(|| black_box(validate_test(black_box(&test)).ok()));
    });

    group.finish();
}

/// Benchmark plan resolution from command-line flags
fn benchmark_config_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_parsing");

    group.bench_function("parse_cli_args", |b| {
        let args = [
            "access-checker",
            "--host", "127.0.0.1:9000",
            "--op", "download",
            "--size", "1MB",
            "--repeat", "5",
        ];
        b.iter(|| black_box(Cli::try_parse_from(black_box(args)).ok()));
    });

    group.bench_function("ad_hoc_definition", |b| {
        let cli = Cli::parse_from(["access-checker", "--host", "h:1", "--op", "upload", "--size", "1KB"]);
        let parser = ConfigParser::new(cli);
        b.iter(|| black_box(parser.ad_hoc().definition()));
    });

    group.finish();
}

/// Benchmark payload hashing and a full exchange over an in-memory duplex stream
fn benchmark_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let runtime = Runtime::new().expect("failed to start tokio runtime");

    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let payload = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("sha256", size), &payload, |b, payload| {
            b.iter(|| black_box(digest(black_box(payload))));
        });

        group.bench_with_input(BenchmarkId::new("download_exchange", size), &size, |b, &size| {
            b.iter(|| {
                runtime.block_on(async {
                    let (mut client, mut server) = tokio::io::duplex(256 * 1024);
                    let serve = tokio::spawn(async move { protocol::respond(&mut server).await });
                    let outcome = protocol::download(&mut client, size as u32).await;
                    let _ = serve.await;
                    black_box(outcome.ok())
                })
            });
        });

        group.bench_with_input(BenchmarkId::new("upload_exchange", size), &payload, |b, payload| {
            b.iter(|| {
                runtime.block_on(async {
                    let (mut client, mut server) = tokio::io::duplex(256 * 1024);
                    let serve = tokio::spawn(async move { protocol::respond(&mut server).await });
                    let outcome = protocol::upload_payload(&mut client, payload).await;
                    let _ = serve.await;
                    black_box(outcome.ok())
                })
            });
        });
    }

    group.finish();
}

/// Benchmark summary aggregation
fn benchmark_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for size in [10usize, 100, 1000, 10000] {
        let results = create_sample_results(size);
        group.bench_with_input(BenchmarkId::new("run_summary", size), &results, |b, results| {
            b.iter(|| black_box(RunSummary::from_results(black_box(results))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_size_parsing,
    benchmark_config_parsing,
    benchmark_codec,
    benchmark_aggregation,
);

criterion_main!(benches);
