//! # Entity Store Integration Test
//!
//! Handle recycling, stale-handle safety and randomized sparse-set churn.

use std::collections::HashMap;

use myth_core::{ComponentArray, EcsError, EntityId, EntityTable, InputState, Key, World};
use myth_core::systems;
use myth_shared::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Destroying through the bare table leaves component data behind; the
/// recycled handle must still not see it.
#[test]
fn test_recycled_index_does_not_see_old_component() {
    let mut table = EntityTable::new();
    let mut health: ComponentArray<u32> = ComponentArray::new();

    let old = table.create();
    health.add(old, 100);
    table.destroy(old).unwrap();

    let new = table.create();
    assert_eq!(new.index(), old.index(), "index should be recycled");

    assert!(!health.has(new));
    assert!(health.try_get(new).is_none());

    health.add(new, 7);
    assert_eq!(*health.get(new), 7);
    assert!(health.try_get(old).is_none());
}

#[test]
fn test_stale_handles_rejected_by_world() {
    let mut world = World::new();
    let a = world.create_player(Vec3::ZERO);
    world.destroy(a).unwrap();
    let b = world.create_player(Vec3::new(1.0, 0.0, 0.0));

    assert_eq!(a.index(), b.index());
    assert!(!world.is_alive(a));
    assert!(world.transforms.try_get(a).is_none());
    assert_eq!(world.destroy(a), Err(EcsError::Expired(a)));
    assert!(world.is_alive(b));
    assert_eq!(world.player(), b);
}

/// Random add/remove sequences against a reference map.
#[test]
fn test_randomized_add_remove_matches_reference() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    for _round in 0..20 {
        let mut array: ComponentArray<u64> = ComponentArray::new();
        let mut reference: HashMap<EntityId, u64> = HashMap::new();
        let pool: Vec<EntityId> = (0..64).map(|i| EntityId::new(i, 0)).collect();

        for _ in 0..2_000 {
            let e = pool[rng.gen_range(0..pool.len())];
            if rng.gen_bool(0.6) {
                let value = rng.gen::<u64>();
                array.add(e, value);
                reference.insert(e, value);
            } else {
                assert_eq!(array.remove(e), reference.remove(&e));
            }

            assert_eq!(array.len(), reference.len());
        }

        let mut visited = 0;
        array.each(|e, value| {
            visited += 1;
            assert_eq!(reference.get(&e), Some(value));
        });
        assert_eq!(visited, array.len());

        for (e, value) in &reference {
            assert_eq!(array.get(*e), value);
        }
        for e in &pool {
            assert_eq!(array.has(*e), reference.contains_key(e));
        }
    }
}

/// Random create/destroy interleaving keeps the live count exact.
#[test]
fn test_randomized_create_destroy_counts() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut table = EntityTable::new();
    let mut live: Vec<EntityId> = Vec::new();
    let mut dead: Vec<EntityId> = Vec::new();

    for _ in 0..5_000 {
        if live.is_empty() || rng.gen_bool(0.55) {
            live.push(table.create());
        } else {
            let i = rng.gen_range(0..live.len());
            let e = live.swap_remove(i);
            table.destroy(e).unwrap();
            dead.push(e);
        }
        assert_eq!(table.count(), live.len());
    }

    assert!(live.iter().all(|e| table.is_alive(*e)));
    assert!(dead.iter().all(|e| !table.is_alive(*e)));

    let mut seen = 0;
    table.each(|_| seen += 1);
    assert_eq!(seen, live.len());
}

/// Player walks forward for two seconds and the camera follows.
#[test]
fn test_walk_and_follow() {
    let mut world = World::new();
    let player = world.create_player(Vec3::ZERO);
    world.create_camera(player);

    let mut input = InputState::holding(&[Key::Forward]);
    for _ in 0..120 {
        systems::update_player_input(&mut world, &input);
        systems::update_movement(&mut world, 1.0 / 60.0);
        systems::update_camera(&mut world, &input, 1.0 / 60.0);
        input.begin_frame();
    }

    let position = world.transforms.get(player).position;
    assert!((position.z - 20.0).abs() < 0.1, "z = {}", position.z);
    assert!(position.x.abs() < 1e-3);

    let eye = systems::camera_position(&world);
    assert!(eye.z < position.z, "camera should trail behind the player");
}
