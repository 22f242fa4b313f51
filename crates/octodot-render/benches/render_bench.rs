//! Benchmarks for waveform, multi-row, heatmap and fingerprint rendering.
//!
//! Run with: cargo bench -p octodot-render

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use octodot_render::{
    FingerprintConfig, Fingerprinter, render_heatmap, render_multi_row, render_waveform,
};
use std::hint::black_box;

fn sine(len: usize, period: f64) -> Vec<f64> {
    (0..len)
        .map(|i| ((i as f64 / period).sin() + 1.0) * 1.5)
        .collect()
}

// ============================================================================
// Waveform
// ============================================================================

fn bench_waveform(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/waveform");

    for len in [120, 1_000, 10_000] {
        let data = sine(len, 7.5);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("connected", len), &data, |b, data| {
            b.iter(|| black_box(render_waveform(black_box(data), true)))
        });
        group.bench_with_input(BenchmarkId::new("unconnected", len), &data, |b, data| {
            b.iter(|| black_box(render_waveform(black_box(data), false)))
        });
    }

    group.finish();
}

fn bench_multi_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/multi_row");
    let data = sine(160, 12.0);

    for height in [2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(height), &height, |b, &h| {
            b.iter(|| black_box(render_multi_row(black_box(&data), h)))
        });
    }

    group.finish();
}

// ============================================================================
// Heatmap
// ============================================================================

fn bench_heatmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/heatmap");

    for size in [20, 80] {
        let grid: Vec<Vec<f64>> = (0..size)
            .map(|y| {
                (0..size)
                    .map(|x| {
                        let dx = (x as f64 - size as f64 / 2.0) / (size as f64 / 2.0);
                        let dy = (y as f64 - size as f64 / 2.0) / (size as f64 / 2.0);
                        (-(dx * dx + dy * dy) * 2.0).exp()
                    })
                    .collect()
            })
            .collect();
        group.bench_with_input(
            BenchmarkId::new("gaussian", format!("{size}x{size}")),
            &grid,
            |b, grid| b.iter(|| black_box(render_heatmap(black_box(grid), true))),
        );
    }

    group.finish();
}

// ============================================================================
// Fingerprint
// ============================================================================

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/fingerprint");
    let samples: Vec<f64> = (0..16_000)
        .map(|i| (std::f64::consts::TAU * 440.0 * i as f64 / 16_000.0).sin())
        .collect();
    let fingerprinter = Fingerprinter::new(FingerprintConfig::default());

    group.bench_function("sine_1s_16k", |b| {
        b.iter(|| black_box(fingerprinter.fingerprint(black_box(&samples), 16_000)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_waveform,
    bench_multi_row,
    bench_heatmap,
    bench_fingerprint
);
criterion_main!(benches);
