//! Benchmarks for shape generation and the per-frame pipeline.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use morphe::prelude::*;
use morphe::shapes::generate_seeded;
use morphe::stroke::resample_seeded;
use morphe::CanvasSize;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for shape in [Shape::Sphere, Shape::Heart, Shape::Galaxy, Shape::SolarSystem, Shape::TorusKnot] {
        group.bench_function(shape.name(), |b| b.iter(|| black_box(generate_seeded(shape, 20_000, 1))));
    }

    group.finish();
}

fn bench_resample(c: &mut Criterion) {
    let strokes: Vec<Stroke> = (0..8)
        .map(|s| {
            (0..64)
                .map(|k| {
                    let a = k as f32 * 0.1 + s as f32;
                    (400.0 + 200.0 * a.cos(), 300.0 + 150.0 * a.sin())
                })
                .collect()
        })
        .collect();
    let canvas = CanvasSize::new(800.0, 600.0);

    c.bench_function("resample_20k", |b| {
        b.iter(|| black_box(resample_seeded(&strokes, 20_000, canvas, 1)))
    });
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for count in [1_000usize, 20_000] {
        let config = MorphConfig {
            particle_count: count,
            ..Default::default()
        };
        let target = generate_seeded(Shape::Galaxy, count, 1);

        let gesture = FrameInput::gesture(GestureSnapshot::new(0.6, Vec2::splat(0.5)));
        group.bench_with_input(BenchmarkId::new("gesture", count), &count, |b, _| {
            let mut updater = FrameUpdater::with_seed(config.clone(), 1);
            let mut t = 0.0;
            b.iter(|| {
                t += 1.0 / 60.0;
                black_box(updater.update(Some(&target), &gesture, t))
            })
        });

        let audio = FrameInput::audio(AudioBands::new(0.8, 0.4, 0.6));
        group.bench_with_input(BenchmarkId::new("audio", count), &count, |b, _| {
            let mut updater = FrameUpdater::with_seed(config.clone(), 1);
            updater.begin_transition();
            let mut t = 0.0;
            b.iter(|| {
                t += 1.0 / 60.0;
                black_box(updater.update(Some(&target), &audio, t))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_resample, bench_frame);
criterion_main!(benches);
