//! Benchmarks for the CPU-side per-frame work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fieldwave::canvas::DrawList;
use fieldwave::config::{FieldConfig, PendulumConfig};
use fieldwave::field::ParticleField;
use fieldwave::pendulum::PendulumWave;
use fieldwave::scene::Scene;
use fieldwave::spawn::Spawner;

fn field(count: usize) -> ParticleField {
    let config = FieldConfig {
        particle_count: count,
        ..FieldConfig::default()
    };
    ParticleField::new(config, 1280.0, 720.0, Spawner::from_seed(42))
}

fn bench_field_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_stages");

    group.bench_function("step", |b| {
        let mut f = field(300);
        b.iter(|| black_box(f.step()))
    });

    group.bench_function("project", |b| {
        let mut f = field(300);
        let mut t = 0.0;
        b.iter(|| {
            t += 1.0 / 60.0;
            f.project(black_box(t));
        })
    });

    group.bench_function("depth_sort", |b| {
        let mut f = field(300);
        f.project(0.0);
        b.iter(|| f.depth_sort())
    });

    group.bench_function("draw", |b| {
        let mut f = field(300);
        f.project(0.0);
        f.depth_sort();
        let mut list = DrawList::with_capacity(301);
        b.iter(|| {
            list.clear();
            black_box(f.draw(&mut list))
        })
    });

    group.finish();
}

fn bench_field_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_frame");

    for count in [100, 300, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("particles", count), &count, |b, &count| {
            let mut f = field(count);
            let mut list = DrawList::with_capacity(count + 1);
            let mut t = 0.0;
            b.iter(|| {
                t += 1.0 / 60.0;
                list.clear();
                black_box(f.frame(t, &mut list))
            })
        });
    }

    group.finish();
}

fn bench_pendulum_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("pendulum_update");

    for count in [20, 200] {
        group.bench_with_input(BenchmarkId::new("pendulums", count), &count, |b, &count| {
            let mut wave = PendulumWave::new(PendulumConfig {
                count,
                ..PendulumConfig::default()
            });
            let mut scene = Scene::default();
            wave.build_scene(&mut scene);
            let mut t = 0.0;
            b.iter(|| {
                t += 1.0 / 60.0;
                wave.update(black_box(t), &mut scene);
                scene.mark_lines_uploaded();
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_field_stages,
    bench_field_frame,
    bench_pendulum_update,
);
criterion_main!(benches);
