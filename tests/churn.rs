//! Randomized churn test: drives the world through thousands of mixed
//! spawn / despawn / add / remove / replace operations and checks the store
//! against a naive shadow model after every phase.

use std::collections::HashMap;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use colonnade::{ComponentId, Entity, World};

const COMPONENTS: usize = 6;
const STEPS: usize = 4_000;

/// Naive per-entity map of component payloads, kept in lockstep with the
/// world under test.
#[derive(Default)]
struct Shadow {
    live: HashMap<Entity, HashMap<ComponentId, u64>>,
}

fn payload(entity: Entity, component: ComponentId, tick: usize) -> u64 {
    ((entity.0 as u64) << 32) ^ ((component as u64) << 16) ^ tick as u64
}

fn verify(world: &World, shadow: &Shadow, components: &[ComponentId]) {
    assert_eq!(world.entity_count(), shadow.live.len());

    for (&entity, expected) in &shadow.live {
        assert!(world.is_alive(entity));

        // Record and row-aligned entity array agree on where the entity is.
        let location = world.location(entity).unwrap();
        assert_eq!(
            world.archetype_entities(location.archetype)[location.row],
            entity
        );

        // Signature, membership, and payload all match the model.
        for &component in components {
            let expected_value = expected.get(&component);
            assert_eq!(
                world.has_component(entity, component).unwrap(),
                expected_value.is_some()
            );
            if let Some(&value) = expected_value {
                assert_eq!(world.get::<u64>(entity, component).unwrap(), &value);
            }
        }
    }

    // Query soundness and completeness, one component at a time.
    for &component in components {
        let matched = world.query(&[component]).unwrap();
        let expected = shadow
            .live
            .iter()
            .filter(|(_, map)| map.contains_key(&component))
            .count();
        assert_eq!(matched.len(), expected);
        for entity in matched {
            assert!(shadow.live[&entity].contains_key(&component));
        }
    }
}

#[test]
fn random_churn_matches_shadow_model() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    let mut world = World::new();
    let mut shadow = Shadow::default();

    let components: Vec<ComponentId> = (0..COMPONENTS)
        .map(|_| world.register_component(8).unwrap())
        .collect();

    for step in 0..STEPS {
        let roll: f32 = rng.gen();
        if shadow.live.is_empty() || roll < 0.30 {
            let entity = world.spawn();
            // Recycling hands back integers of dead entities only; a live
            // duplicate would clobber the shadow entry here.
            assert!(shadow.live.insert(entity, HashMap::new()).is_none());
        } else if roll < 0.45 {
            let entity = *shadow.live.keys().choose(&mut rng).unwrap();
            world.despawn(entity).unwrap();
            shadow.live.remove(&entity);
        } else if roll < 0.85 {
            let entity = *shadow.live.keys().choose(&mut rng).unwrap();
            let component = *components.choose(&mut rng).unwrap();
            let value = payload(entity, component, step);
            world.add(entity, component, value).unwrap();
            shadow.live.get_mut(&entity).unwrap().insert(component, value);
        } else {
            let entity = *shadow.live.keys().choose(&mut rng).unwrap();
            let component = *components.choose(&mut rng).unwrap();
            let had = shadow
                .live
                .get_mut(&entity)
                .unwrap()
                .remove(&component)
                .is_some();
            let result = world.remove_component(entity, component);
            assert_eq!(result.is_ok(), had);
        }

        if step % 250 == 0 {
            verify(&world, &shadow, &components);
        }
    }

    verify(&world, &shadow, &components);
}

#[test]
fn recycled_handles_never_alias_live_entities() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xA11A5);
    let mut world = World::new();
    let hp = world.register_component(8).unwrap();
    let mut live: Vec<Entity> = Vec::new();

    for step in 0..2_000 {
        if live.is_empty() || rng.gen_bool(0.6) {
            let entity = world.spawn();
            assert!(!live.contains(&entity), "spawn returned a live handle");
            world.add(entity, hp, step as u64).unwrap();
            live.push(entity);
        } else {
            let index = rng.gen_range(0..live.len());
            let entity = live.swap_remove(index);
            world.despawn(entity).unwrap();
            assert!(!world.is_alive(entity));
        }
    }
    assert_eq!(world.entity_count(), live.len());
}
