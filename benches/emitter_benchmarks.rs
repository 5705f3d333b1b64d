//! 粒子发射器性能基准测试
//!
//! 测试粒子生成、逐帧更新和场景驱动的性能

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use particle_engine::particles::{ActorFactory, Emitter, GeneratorParams};
use particle_engine::scene::{Actor, Stage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn plume(count: u32) -> (Stage, Emitter) {
    let mut stage = Stage::new();
    let mut emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None)
        .expect("spawn emitter")
        .with_gravity(9.8);
    let params = GeneratorParams::new(count, "actor")
        .with_duration(2.0)
        .with_speed(100.0)
        .with_rate(4.0);
    let mut rng = StdRng::seed_from_u64(42);
    emitter
        .generate_plume(&mut stage, &ActorFactory::new(), &params, &mut rng)
        .expect("generate plume");
    (stage, emitter)
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_explosion");
    let factory = ActorFactory::new();

    for count in [100u32, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let params = GeneratorParams::new(count, "actor").with_duration(1.0);
            b.iter(|| {
                let mut stage = Stage::new();
                let mut emitter =
                    Emitter::spawn(&mut stage, Actor::new("emitter"), None).expect("spawn");
                let mut rng = StdRng::seed_from_u64(7);
                emitter
                    .generate_explosion(&mut stage, &factory, &params, &mut rng)
                    .expect("generate");
                black_box((stage, emitter))
            });
        });
    }

    group.finish();
}

fn bench_emitter_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("emitter_update");

    for count in [100u32, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let (mut stage, mut emitter) = plume(count);
            b.iter(|| black_box(emitter.update(&mut stage, 1.0 / 60.0).expect("update")));
        });
    }

    group.finish();
}

fn bench_orphan_respawn(c: &mut Criterion) {
    let mut group = c.benchmark_group("orphan_respawn");

    for count in [1000u32, 2000, 4000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let mut stage = Stage::new();
            let layer = stage.spawn(Actor::new("layer"), None).expect("spawn layer");
            let mut emitter =
                Emitter::spawn(&mut stage, Actor::new("emitter"), None).expect("spawn emitter");
            // 所有粒子同时出生，每次更新都全部重生
            let params = GeneratorParams::new(count, "actor")
                .with_duration(0.02)
                .with_rate(1.0e9)
                .with_parent(layer);
            let mut rng = StdRng::seed_from_u64(42);
            emitter
                .generate_plume(&mut stage, &ActorFactory::new(), &params, &mut rng)
                .expect("generate plume");
            b.iter(|| black_box(emitter.update(&mut stage, 0.02).expect("update")));
        });
    }

    group.finish();
}

fn bench_stage_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("stage_update");

    for count in [100u32, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let (mut stage, emitter) = plume(count);
            emitter.attach(&mut stage).expect("attach");
            b.iter(|| stage.update(black_box(1.0 / 60.0)).expect("stage update"));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_generate,
    bench_emitter_update,
    bench_orphan_respawn,
    bench_stage_update
);
criterion_main!(benches);
