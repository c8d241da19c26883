//! Benchmarks for the renderer crate - rasterization and PNG encoding.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use renderer::{png, rasterize, ColorMode};
use topo_common::Sample;

/// Noisy terrain rising from sea to mountains west to east.
fn generate_terrain(columns: usize, rows: usize) -> Vec<Sample> {
    let mut rng = rand::thread_rng();
    let mut samples = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        let lat = 60.0 - row as f64 / 120.0;
        for col in 0..columns {
            let lon = 20.0 + col as f64 / 120.0;
            let base = -500.0 + (col as f64 / columns as f64) * 3000.0;
            let noise: f64 = rng.gen_range(-50.0..50.0);
            samples.push(Sample::new(lat, lon, (base + noise).round()));
        }
    }
    samples
}

// =============================================================================
// RASTERIZE BENCHMARKS
// =============================================================================

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterize");

    let scenarios = [
        // (columns, rows, width, height, name)
        (25, 25, 400, 400, "estonia_coarse"),
        (360, 360, 2400, 2400, "estonia_full"),
        (240, 160, 1800, 1200, "europe_auto"),
        (1000, 1000, 1000, 1000, "one_px_cells"),
    ];

    for (columns, rows, width, height, name) in scenarios {
        let samples = generate_terrain(columns, rows);
        group.throughput(Throughput::Elements((width * height) as u64));

        for mode in [ColorMode::Color, ColorMode::Grayscale] {
            group.bench_with_input(
                BenchmarkId::new(name, format!("{:?}", mode)),
                &samples,
                |b, samples| {
                    b.iter(|| rasterize(black_box(samples), width, height, mode).unwrap());
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// PNG ENCODING BENCHMARKS
// =============================================================================

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");

    for (columns, rows, size) in [(25, 25, 400u32), (240, 240, 1200)] {
        let canvas = rasterize(&generate_terrain(columns, rows), size, size, ColorMode::Color).unwrap();
        let rgba = canvas.as_rgba().to_vec();
        let pixels = (size * size) as usize;
        group.throughput(Throughput::Bytes((pixels * 4) as u64));

        group.bench_with_input(BenchmarkId::new("auto", size), &rgba, |b, rgba| {
            b.iter(|| png::create_png_auto(black_box(rgba), size as usize, size as usize).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("rgb", size), &rgba, |b, rgba| {
            b.iter(|| png::create_png(black_box(rgba), size as usize, size as usize).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rasterize, bench_png_encoding);
criterion_main!(benches);
