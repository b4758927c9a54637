//! Content encoding benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docfeed_bench::{random_data, text_data};
use docfeed_core::{ContentEncodingPipeline, DEFAULT_MAX_DOCUMENT_SIZE};
use docfeed_spi::ContentReader;
use std::io::Cursor;

fn reader(data: &[u8]) -> Option<ContentReader> {
    Some(Box::new(Cursor::new(data.to_vec())))
}

/// Benchmark base64 and compressed encoding across sizes.
fn bench_encodings(c: &mut Criterion) {
    let binary = ContentEncodingPipeline::negotiate("base64binary", true, DEFAULT_MAX_DOCUMENT_SIZE);
    let compressed = ContentEncodingPipeline::negotiate(
        "base64binary,base64compressed",
        true,
        DEFAULT_MAX_DOCUMENT_SIZE,
    );

    for (name, pipeline) in [("base64binary", &binary), ("base64compressed", &compressed)] {
        let mut group = c.benchmark_group(name);
        let plan = pipeline.select(None).unwrap();

        for size in [1024, 64 * 1024, 1024 * 1024] {
            let text = text_data(size);
            let random = random_data(size);
            group.throughput(Throughput::Bytes(size as u64));

            group.bench_with_input(BenchmarkId::new("text", size), &text, |b, data| {
                b.iter(|| {
                    let mut out = Vec::with_capacity(size * 2);
                    pipeline
                        .write_content(plan, reader(data), b" ", &mut out)
                        .unwrap();
                    black_box(out);
                });
            });

            group.bench_with_input(BenchmarkId::new("random", size), &random, |b, data| {
                b.iter(|| {
                    let mut out = Vec::with_capacity(size * 2);
                    pipeline
                        .write_content(plan, reader(data), b" ", &mut out)
                        .unwrap();
                    black_box(out);
                });
            });
        }

        group.finish();
    }
}

/// Benchmark unwrapped output.
fn bench_unwrapped(c: &mut Criterion) {
    let pipeline = ContentEncodingPipeline::negotiate("base64binary", false, DEFAULT_MAX_DOCUMENT_SIZE);
    let plan = pipeline.select(None).unwrap();
    let data = text_data(64 * 1024);

    c.bench_function("base64binary_unwrapped_64k", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(data.len() * 2);
            pipeline
                .write_content(plan, reader(&data), b" ", &mut out)
                .unwrap();
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_encodings, bench_unwrapped);

criterion_main!(benches);
