//! Criterion microbenches for the YOLO codec and batch export.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Encoding image-space rectangles to YOLO text (encode)
//! - Decoding YOLO text back to rectangles (decode)
//! - Sequential vs. parallel batch export into memory storage

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use boxlabel::annotation::io_yolo::{decode, encode};
use boxlabel::annotation::Rectangle;
use boxlabel::export::{export_batch, ExportOptions, ExportRequest};
use boxlabel::geometry::Rect;
use boxlabel::storage::MemoryStorage;

const IMAGE_WIDTH: u32 = 1920;
const IMAGE_HEIGHT: u32 = 1080;

/// A deterministic spread of boxes across a 1080p frame.
fn sample_rectangles(count: usize) -> Vec<Rectangle> {
    (0..count)
        .map(|i| {
            let x = (i * 37 % 1800) as f64;
            let y = (i * 53 % 1000) as f64;
            Rectangle::new(Rect::from_xywh(x, y, 64.0, 48.0), (i % 10) as u32)
        })
        .collect()
}

/// Benchmark YOLO encoding.
fn bench_yolo_encode(c: &mut Criterion) {
    let rectangles = sample_rectangles(500);

    let mut group = c.benchmark_group("yolo_encode");
    group.throughput(Throughput::Elements(rectangles.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| {
            let text = encode(black_box(&rectangles), IMAGE_WIDTH, IMAGE_HEIGHT).unwrap();
            black_box(text)
        })
    });

    group.finish();
}

/// Benchmark YOLO decoding.
fn bench_yolo_decode(c: &mut Criterion) {
    // Encode once (outside the timed region)
    let text = encode(&sample_rectangles(500), IMAGE_WIDTH, IMAGE_HEIGHT)
        .expect("Failed to encode fixture");

    let mut group = c.benchmark_group("yolo_decode");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("decode", |b| {
        b.iter(|| {
            let rects = decode(black_box(&text), IMAGE_WIDTH, IMAGE_HEIGHT);
            black_box(rects)
        })
    });

    group.finish();
}

/// Benchmark batch export, one thread vs. the rayon pool.
fn bench_export_batch(c: &mut Criterion) {
    let requests: Vec<ExportRequest> = (0..64)
        .map(|i| {
            ExportRequest::new(
                format!("/bench/frame_{i:04}.jpg"),
                sample_rectangles(50),
                IMAGE_WIDTH,
                IMAGE_HEIGHT,
            )
        })
        .collect();

    let mut group = c.benchmark_group("export_batch");
    group.throughput(Throughput::Elements(requests.len() as u64));

    for parallel in [false, true] {
        let name = if parallel { "parallel" } else { "sequential" };
        let opts = ExportOptions {
            parallel,
            ..Default::default()
        };
        group.bench_function(name, |b| {
            b.iter(|| {
                let storage = MemoryStorage::new();
                let batch = export_batch(&storage, black_box(&requests), &opts);
                black_box(batch)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_yolo_encode,
    bench_yolo_decode,
    bench_export_batch,
);
criterion_main!(benches);
