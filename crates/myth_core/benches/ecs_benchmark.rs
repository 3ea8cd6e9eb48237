//! # ECS Performance Benchmark
//!
//! Sparse-set churn and the per-tick systems at crowd scale.
//!
//! Run with: `cargo bench --package myth_core`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use myth_core::systems;
use myth_core::{ComponentArray, EntityId, InputState, Key, PlayerController, Transform, Velocity, World};
use myth_shared::Vec3;

/// Entities driven by movement in the crowd benchmark.
const CROWD: usize = 100_000;

/// World with `count` controller-driven walkers plus a player and camera.
fn crowd_world(count: usize) -> World {
    let mut world = World::new();
    let player = world.create_player(Vec3::ZERO);
    world.create_camera(player);

    for i in 0..count {
        #[allow(clippy::cast_precision_loss)]
        let f = i as f32;
        let e = world.create_entity(Transform::from_position(Vec3::new(f, 0.0, -f)));
        world.velocities.add(
            e,
            Velocity {
                linear: Vec3::new(1.0, 0.0, 0.5),
                angular: Vec3::ZERO,
            },
        );
        world.player_controllers.add(
            e,
            PlayerController {
                target_yaw: f % 360.0,
                ..PlayerController::default()
            },
        );
    }
    world
}

/// Benchmark: create entities with a transform.
fn bench_create_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_entities");

    for count in [1_000, 10_000, CROWD] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut world = World::new();
                for _ in 0..count {
                    black_box(world.create_entity(Transform::default()));
                }
                world.entities.count()
            });
        });
    }

    group.finish();
}

/// Benchmark: add/remove churn on a single array (swap-remove path).
fn bench_sparse_set_churn(c: &mut Criterion) {
    #[allow(clippy::cast_possible_truncation)]
    let ids: Vec<EntityId> = (0..CROWD as u32).map(|i| EntityId::new(i, 0)).collect();

    c.bench_function("sparse_set_add_remove_100K", |b| {
        let mut array: ComponentArray<Velocity> = ComponentArray::new();
        b.iter(|| {
            for &e in &ids {
                array.add(e, Velocity::default());
            }
            for &e in ids.iter().step_by(2) {
                black_box(array.remove(e));
            }
            for &e in ids.iter().skip(1).step_by(2) {
                black_box(array.remove(e));
            }
            array.len()
        });
    });
}

/// THE HOT PATH: one full system tick over the crowd.
fn bench_systems_tick(c: &mut Criterion) {
    let mut world = crowd_world(CROWD);
    let input = InputState::holding(&[Key::Forward]);

    c.bench_function("systems_tick_100K", |b| {
        b.iter(|| {
            systems::update_player_input(&mut world, &input);
            systems::update_movement(&mut world, 0.016);
            systems::update_camera(&mut world, &input, 0.016);
            black_box(world.transforms.len())
        });
    });
}

/// Benchmark: destroy with cascade across every array.
fn bench_destroy_cascade(c: &mut Criterion) {
    c.bench_function("destroy_cascade_10K", |b| {
        b.iter_batched(
            || {
                let world = crowd_world(10_000);
                let ids: Vec<EntityId> = world.transforms.entities().to_vec();
                (ids, world)
            },
            |(ids, mut world)| {
                for e in ids {
                    let _ = world.destroy(e);
                }
                world.entities.count()
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_create_entities,
    bench_sparse_set_churn,
    bench_systems_tick,
    bench_destroy_cascade,
);
criterion_main!(benches);
