//! Benchmarks for visible-row location and thumb estimation.
//!
//! Run with: cargo bench -p scrollpeek-core

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use scrollpeek_core::geometry::{ScreenRect, ScrollMetrics};
use scrollpeek_core::locator::{RowGeometrySnapshot, locate};
use scrollpeek_core::thumb::{ThumbGeometry, estimate};
use std::hint::black_box;

const ROW_HEIGHT: f64 = 24.0;

fn rows(count: usize) -> Vec<RowGeometrySnapshot<usize>> {
    (0..count)
        .map(|i| RowGeometrySnapshot::new(i, 32.0 + i as f64 * ROW_HEIGHT, None))
        .collect()
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator/locate");

    for count in [100usize, 10_000, 1_000_000] {
        let rows = rows(count);
        let edge = count as f64 * ROW_HEIGHT * 0.61;
        group.bench_with_input(BenchmarkId::new("rows", count), &rows, |b, rows| {
            b.iter(|| locate(black_box(rows), black_box(edge)))
        });
    }

    group.finish();
}

fn bench_estimate(c: &mut Criterion) {
    let geometry = ThumbGeometry::default();
    let bounds = ScreenRect::new(0.0, 64.0, 1200.0, 800.0);
    c.bench_function("thumb/estimate", |b| {
        b.iter(|| {
            estimate(
                black_box(&ScrollMetrics::new(12_345.0, 240_000.0, 800.0)),
                &geometry,
                &bounds,
                black_box(&ScreenRect::from_size(1400.0, 1000.0)),
            )
        })
    });
}

criterion_group!(benches, bench_locate, bench_estimate);
criterion_main!(benches);
