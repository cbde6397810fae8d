#![allow(clippy::unwrap_used, missing_docs)]
//! Benchmark for the row-parallel Mandelbrot engine.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use grayraster::compute::{PoolMode, ScanlineEngine, ZoomSettings};
use grayraster::framebuffer::Framebuffer;

fn pool_mode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("mandelbrot_frame");
    group.sample_size(20);

    let settings = ZoomSettings::default();
    let view = settings.view(0, 800, 600).unwrap();

    for (name, mode) in [("persistent", PoolMode::Persistent), ("scoped", PoolMode::Scoped)] {
        let engine = ScanlineEngine::new(mode, 0).unwrap();
        let mut fb = Framebuffer::new(800, 600).unwrap();
        group.bench_function(BenchmarkId::new(name, "800x600"), |b| {
            b.iter(|| engine.render(&mut fb, &view).unwrap());
        });
    }

    group.finish();
}

fn worker_scaling_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("mandelbrot_workers");
    group.sample_size(20);

    let view = ZoomSettings::default().view(0, 400, 300).unwrap();

    for workers in [1, 2, 4, 8] {
        let engine = ScanlineEngine::new(PoolMode::Persistent, workers).unwrap();
        let mut fb = Framebuffer::new(400, 300).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| engine.render(&mut fb, &view).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, pool_mode_benchmark, worker_scaling_benchmark);
criterion_main!(benches);
