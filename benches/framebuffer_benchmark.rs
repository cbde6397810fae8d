#![allow(clippy::unwrap_used, missing_docs)]
//! Benchmark for framebuffer operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grayraster::framebuffer::Framebuffer;
use grayraster::render::draw_line;

fn framebuffer_clear_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("framebuffer_clear");

    for (width, height) in [(800, 600), (1920, 1080), (3840, 2160)] {
        let mut fb = Framebuffer::new(width, height).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(width, height),
            |b, _| {
                b.iter(|| {
                    fb.clear(black_box(192));
                });
            },
        );
    }

    group.finish();
}

fn framebuffer_set_pixel_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("framebuffer_set_pixel");

    let mut fb = Framebuffer::new(800, 600).unwrap();

    group.bench_function("standalone_800x600", |b| {
        b.iter(|| {
            for y in (0..600).step_by(8) {
                for x in (0..800).step_by(8) {
                    fb.set_pixel(black_box(x), black_box(y), 255);
                }
            }
        });
    });

    group.bench_function("one_session_800x600", |b| {
        b.iter(|| {
            let mut session = fb.session();
            for y in (0..600).step_by(8) {
                for x in (0..800).step_by(8) {
                    session.set_pixel(black_box(x), black_box(y), 255);
                }
            }
        });
    });

    group.finish();
}

fn line_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_line");

    let mut fb = Framebuffer::new(800, 600).unwrap();

    group.bench_function("horizontal_fast_path", |b| {
        b.iter(|| {
            for y in 0..600 {
                draw_line(&mut fb, 0, black_box(y), 799, y, 255);
            }
        });
    });

    group.bench_function("starburst_36", |b| {
        b.iter(|| {
            let mut session = fb.session();
            for i in 0..36 {
                let a = f64::from(i * 10).to_radians();
                let x = (400.0 + a.cos() * 290.0) as i32;
                let y = (300.0 + a.sin() * 290.0) as i32;
                draw_line(&mut *session, 400, 300, black_box(x), black_box(y), 255);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, framebuffer_clear_benchmark, framebuffer_set_pixel_benchmark, line_benchmark);
criterion_main!(benches);
