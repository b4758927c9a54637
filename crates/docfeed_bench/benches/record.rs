//! Record and feed encoding benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docfeed_bench::documents;
use docfeed_core::{FeedConfig, FeedEncoder, SequentialIdGenerator};
use docfeed_spi::FeedType;

fn config() -> FeedConfig {
    FeedConfig::new("bench", FeedType::Content).max_feed_size(64 * 1024 * 1024)
}

/// Benchmark single records with growing metadata.
fn bench_add_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_record");
    let ids = SequentialIdGenerator::new("bench");

    for meta_count in [0, 10, 100] {
        let docs = documents(1, meta_count, 1024);
        group.bench_with_input(BenchmarkId::new("metadata", meta_count), &docs, |b, docs| {
            b.iter(|| {
                let mut encoder = FeedEncoder::open(config(), &ids).unwrap();
                encoder.add_record(black_box(&docs[0])).unwrap();
                black_box(encoder.size());
            });
        });
    }

    group.finish();
}

/// Benchmark whole feeds.
fn bench_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed");
    let ids = SequentialIdGenerator::new("bench");

    for count in [10, 100, 1000] {
        let docs = documents(count, 8, 512);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("records", count), &docs, |b, docs| {
            b.iter(|| {
                let mut encoder = FeedEncoder::open(config(), &ids).unwrap();
                for doc in docs {
                    encoder.add_record(doc).unwrap();
                }
                encoder.close().unwrap();
                black_box(encoder.into_bytes());
            });
        });
    }

    group.finish();
}

/// Benchmark a discarded record followed by truncation.
fn bench_truncate(c: &mut Criterion) {
    let ids = SequentialIdGenerator::new("bench");
    let docs = documents(1, 8, 4096);

    c.bench_function("add_then_truncate", |b| {
        let mut encoder = FeedEncoder::open(config(), &ids).unwrap();
        let mark = encoder.size();
        b.iter(|| {
            encoder.add_record(black_box(&docs[0])).unwrap();
            encoder.truncate(mark).unwrap();
        });
    });
}

criterion_group!(benches, bench_add_record, bench_feed, bench_truncate);

criterion_main!(benches);
