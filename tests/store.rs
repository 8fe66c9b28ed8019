use bytemuck::{Pod, Zeroable};

use colonnade::{
    build_signature, CapacityError, ComponentId, EcsError, Entity, World, COMPONENT_CAP,
};

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Velocity {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Health(u32);

#[test]
fn register_assigns_sequential_ids() {
    let mut world = World::new();
    let a = world.register_component(8).unwrap();
    let b = world.register_component(4).unwrap();
    let c = world.register_component(16).unwrap();
    assert_eq!((a, b, c), (0, 1, 2));
    assert_eq!(world.component_size(b), Some(4));
    assert_eq!(world.component_size(99), None);
    assert_eq!(world.component_count(), 3);
}

#[test]
fn register_rejects_zero_size() {
    let mut world = World::new();
    assert!(matches!(
        world.register_component(0),
        Err(EcsError::ZeroSizedComponent)
    ));
    // The failed call consumed no ID.
    assert_eq!(world.register_component(4).unwrap(), 0);
}

#[test]
fn register_rejects_overflow_past_capacity() {
    let mut world = World::new();
    for _ in 0..COMPONENT_CAP {
        world.register_component(4).unwrap();
    }

    assert!(matches!(
        world.register_component(4),
        Err(EcsError::Capacity(CapacityError {
            registered: COMPONENT_CAP,
            capacity: COMPONENT_CAP,
        }))
    ));
    // The failed registration consumed nothing.
    assert_eq!(world.component_count(), COMPONENT_CAP);

    // The table is still fully usable, last ID included.
    let last = (COMPONENT_CAP - 1) as ComponentId;
    let entity = world.spawn();
    world.add(entity, last, 7u32).unwrap();
    assert_eq!(world.get::<u32>(entity, last).unwrap(), &7);
}

#[test]
#[should_panic]
fn signature_rejects_out_of_range_component() {
    build_signature(&[COMPONENT_CAP as ComponentId]);
}

#[test]
#[should_panic(expected = "archetype id space exhausted")]
fn archetype_id_space_is_checked() {
    let mut world = World::new();
    let components: Vec<ComponentId> = (0..17)
        .map(|_| world.register_component(8).unwrap())
        .collect();

    // Signatures 0..=65535 fill the 16-bit ID space (signature 0 is the
    // pre-created empty archetype); one more must refuse to alias.
    for bits in 0u32..=65_536 {
        let subset: Vec<ComponentId> = components
            .iter()
            .enumerate()
            .filter(|(bit, _)| (bits >> bit) & 1 == 1)
            .map(|(_, &component)| component)
            .collect();
        let _ = world.get_or_create_archetype(build_signature(&subset));
    }
}

#[test]
fn spawned_entity_starts_empty() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let entity = world.spawn();

    assert!(world.is_alive(entity));
    assert_eq!(world.entity_count(), 1);
    assert_eq!(world.has_component(entity, pos), Ok(false));
    assert!(world.signature_of(entity).unwrap().is_empty());
    // Only the empty archetype exists so far.
    assert_eq!(world.archetype_count(), 1);
}

#[test]
fn add_component_migrates_and_stores_bytes() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let entity = world.spawn();

    world
        .add(entity, pos, Position { x: 1.0, y: 2.0 })
        .unwrap();

    assert_eq!(world.has_component(entity, pos), Ok(true));
    assert_eq!(world.archetype_count(), 2);
    assert_eq!(
        world.get::<Position>(entity, pos).unwrap(),
        &Position { x: 1.0, y: 2.0 }
    );

    // The empty archetype no longer holds the entity.
    assert!(world.archetype_entities(0).is_empty());
    let location = world.location(entity).unwrap();
    assert_eq!(world.archetype_entities(location.archetype)[location.row], entity);
}

#[test]
fn add_existing_component_replaces_in_place() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let entity = world.spawn();

    world.add(entity, pos, Position { x: 1.0, y: 2.0 }).unwrap();
    let before = world.location(entity).unwrap();

    world.add(entity, pos, Position { x: 9.0, y: 8.0 }).unwrap();
    let after = world.location(entity).unwrap();

    // No migration: same archetype, same row, no new archetype created.
    assert_eq!(before, after);
    assert_eq!(world.archetype_count(), 2);
    assert_eq!(
        world.get::<Position>(entity, pos).unwrap(),
        &Position { x: 9.0, y: 8.0 }
    );
}

#[test]
fn migration_carries_existing_data() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let vel = world.register_component(8).unwrap();
    let hp = world.register_component(4).unwrap();
    let entity = world.spawn();

    world.add(entity, pos, Position { x: 1.0, y: 2.0 }).unwrap();
    world.add(entity, vel, Velocity { x: 0.5, y: -0.5 }).unwrap();
    world.add(entity, hp, Health(100)).unwrap();

    assert_eq!(
        world.get::<Position>(entity, pos).unwrap(),
        &Position { x: 1.0, y: 2.0 }
    );
    assert_eq!(
        world.get::<Velocity>(entity, vel).unwrap(),
        &Velocity { x: 0.5, y: -0.5 }
    );
    assert_eq!(world.get::<Health>(entity, hp).unwrap(), &Health(100));

    let signature = world.signature_of(entity).unwrap();
    assert!(signature.has(pos) && signature.has(vel) && signature.has(hp));
    assert_eq!(signature.count(), 3);
}

#[test]
fn archetypes_are_shared_and_idempotent() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let vel = world.register_component(8).unwrap();

    let a = world.spawn();
    let b = world.spawn();
    for &entity in &[a, b] {
        world.add(entity, pos, Position { x: 0.0, y: 0.0 }).unwrap();
        world.add(entity, vel, Velocity { x: 0.0, y: 0.0 }).unwrap();
    }

    // empty, {pos}, {pos, vel}; the second entity reused both.
    assert_eq!(world.archetype_count(), 3);
    assert_eq!(
        world.location(a).unwrap().archetype,
        world.location(b).unwrap().archetype
    );

    let signature = world.signature_of(a).unwrap();
    let id = world.get_or_create_archetype(signature).unwrap();
    assert_eq!(id, world.location(a).unwrap().archetype);
    assert_eq!(world.archetype_count(), 3);
}

#[test]
fn remove_component_migrates_back_and_drops_data() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let vel = world.register_component(8).unwrap();
    let entity = world.spawn();

    world.add(entity, pos, Position { x: 3.0, y: 4.0 }).unwrap();
    world.add(entity, vel, Velocity { x: 1.0, y: 1.0 }).unwrap();

    world.remove_component(entity, vel).unwrap();

    assert_eq!(world.has_component(entity, vel), Ok(false));
    assert_eq!(
        world.get::<Position>(entity, pos).unwrap(),
        &Position { x: 3.0, y: 4.0 }
    );
    assert!(matches!(
        world.get::<Velocity>(entity, vel),
        Err(EcsError::MissingComponent { .. })
    ));

    // Removing the last component lands back in the empty archetype.
    world.remove_component(entity, pos).unwrap();
    assert_eq!(world.location(entity).unwrap().archetype, 0);
    assert!(world.signature_of(entity).unwrap().is_empty());
}

#[test]
fn remove_absent_component_fails_without_mutation() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let vel = world.register_component(8).unwrap();
    let entity = world.spawn();
    world.add(entity, pos, Position { x: 1.0, y: 1.0 }).unwrap();
    let before = world.location(entity).unwrap();

    assert!(matches!(
        world.remove_component(entity, vel),
        Err(EcsError::MissingComponent { .. })
    ));
    assert_eq!(world.location(entity).unwrap(), before);
    assert_eq!(
        world.get::<Position>(entity, pos).unwrap(),
        &Position { x: 1.0, y: 1.0 }
    );
}

#[test]
fn despawn_compacts_by_swapping_last_row() {
    let mut world = World::new();
    let hp = world.register_component(4).unwrap();

    let a = world.spawn();
    let b = world.spawn();
    let c = world.spawn();
    world.add(a, hp, Health(1)).unwrap();
    world.add(b, hp, Health(2)).unwrap();
    world.add(c, hp, Health(3)).unwrap();

    let archetype = world.location(a).unwrap().archetype;
    assert_eq!(world.location(a).unwrap().row, 0);

    // Removing the first row moves the last entity into it.
    world.despawn(a).unwrap();
    assert!(!world.is_alive(a));
    assert_eq!(world.entity_count(), 2);
    assert_eq!(world.location(c).unwrap().row, 0);
    assert_eq!(world.get::<Health>(c, hp).unwrap(), &Health(3));
    assert_eq!(world.get::<Health>(b, hp).unwrap(), &Health(2));
    assert_eq!(world.archetype_entities(archetype).len(), 2);
}

#[test]
fn despawned_handles_are_recycled() {
    let mut world = World::new();
    let a = world.spawn();
    let b = world.spawn();
    world.despawn(a).unwrap();

    // The freed integer comes back on the next spawn, with a clean record.
    let c = world.spawn();
    assert_eq!(c, a);
    assert!(world.is_alive(c));
    assert!(world.signature_of(c).unwrap().is_empty());
    assert!(world.is_alive(b));
    assert_eq!(world.entity_count(), 2);
}

#[test]
fn dead_handles_are_rejected_everywhere() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let entity = world.spawn();
    world.add(entity, pos, Position { x: 0.0, y: 0.0 }).unwrap();
    world.despawn(entity).unwrap();

    let dead = entity;
    assert!(matches!(
        world.add(dead, pos, Position { x: 1.0, y: 1.0 }),
        Err(EcsError::InvalidEntity(_))
    ));
    assert!(matches!(
        world.remove_component(dead, pos),
        Err(EcsError::InvalidEntity(_))
    ));
    assert!(matches!(
        world.get::<Position>(dead, pos),
        Err(EcsError::InvalidEntity(_))
    ));
    assert!(matches!(world.despawn(dead), Err(EcsError::InvalidEntity(_))));
    assert!(matches!(
        world.has_component(dead, pos),
        Err(EcsError::InvalidEntity(_))
    ));
    assert!(matches!(
        world.query(&[pos]),
        Ok(ref matched) if matched.is_empty()
    ));

    // A never-issued handle is just as dead.
    let unknown = Entity(1234);
    assert!(matches!(
        world.despawn(unknown),
        Err(EcsError::InvalidEntity(_))
    ));
}

#[test]
fn unregistered_components_are_rejected() {
    let mut world = World::new();
    let entity = world.spawn();
    assert!(matches!(
        world.add_component(entity, 7, &[0u8; 4]),
        Err(EcsError::InvalidComponent(7))
    ));
    assert!(matches!(
        world.remove_component(entity, 7),
        Err(EcsError::InvalidComponent(7))
    ));
    assert!(matches!(
        world.has_component(entity, 7),
        Err(EcsError::InvalidComponent(7))
    ));
    assert!(matches!(
        world.query(&[7]),
        Err(EcsError::InvalidComponent(7))
    ));
}

#[test]
fn byte_length_is_validated_before_mutation() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let entity = world.spawn();

    assert!(matches!(
        world.add_component(entity, pos, &[0u8; 3]),
        Err(EcsError::SizeMismatch {
            expected: 8,
            got: 3,
            ..
        })
    ));
    assert_eq!(world.has_component(entity, pos), Ok(false));
    assert_eq!(world.archetype_count(), 1);

    // The typed layer enforces the same check against size_of::<T>().
    assert!(matches!(
        world.add(entity, pos, Health(1)),
        Err(EcsError::SizeMismatch { .. })
    ));
}

#[test]
fn raw_byte_access_round_trips() {
    let mut world = World::new();
    let hp = world.register_component(4).unwrap();
    let entity = world.spawn();
    world.add_component(entity, hp, &42u32.to_le_bytes()).unwrap();

    assert_eq!(
        world.component_bytes(entity, hp).unwrap(),
        &42u32.to_le_bytes()
    );
    world
        .component_bytes_mut(entity, hp)
        .unwrap()
        .copy_from_slice(&7u32.to_le_bytes());
    assert_eq!(world.get::<Health>(entity, hp).unwrap(), &Health(7));
}

#[test]
fn typed_mutation_writes_through() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let entity = world.spawn();
    world.add(entity, pos, Position { x: 1.0, y: 1.0 }).unwrap();

    world.get_mut::<Position>(entity, pos).unwrap().x = 5.0;
    assert_eq!(
        world.get::<Position>(entity, pos).unwrap(),
        &Position { x: 5.0, y: 1.0 }
    );
}

#[test]
fn query_matches_supersets_in_creation_order() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let vel = world.register_component(8).unwrap();
    let hp = world.register_component(4).unwrap();

    let plain = world.spawn();
    let mover = world.spawn();
    let full = world.spawn();

    world.add(plain, pos, Position { x: 0.0, y: 0.0 }).unwrap();
    world.add(mover, pos, Position { x: 0.0, y: 0.0 }).unwrap();
    world.add(mover, vel, Velocity { x: 1.0, y: 0.0 }).unwrap();
    world.add(full, pos, Position { x: 0.0, y: 0.0 }).unwrap();
    world.add(full, vel, Velocity { x: 1.0, y: 0.0 }).unwrap();
    world.add(full, hp, Health(10)).unwrap();

    let with_pos = world.query(&[pos]).unwrap();
    assert_eq!(with_pos.len(), 3);

    let with_vel = world.query(&[vel]).unwrap();
    assert_eq!(with_vel.len(), 2);
    assert!(with_vel.contains(&mover) && with_vel.contains(&full));

    let with_all = world.query(&[pos, vel, hp]).unwrap();
    assert_eq!(with_all, vec![full]);

    // Empty requirement matches every live entity, including component-free
    // ones sitting in the empty archetype.
    let everyone = world.query(&[]).unwrap();
    assert_eq!(everyone.len(), 3);

    let need = build_signature(&[pos, vel]);
    assert_eq!(world.query_signature(&need), with_vel);
}

#[test]
fn query_skips_despawned_entities() {
    let mut world = World::new();
    let hp = world.register_component(4).unwrap();
    let a = world.spawn();
    let b = world.spawn();
    world.add(a, hp, Health(1)).unwrap();
    world.add(b, hp, Health(2)).unwrap();

    world.despawn(a).unwrap();
    assert_eq!(world.query(&[hp]).unwrap(), vec![b]);
}

#[test]
fn rows_stay_aligned_across_mixed_churn() {
    let mut world = World::new();
    let pos = world.register_component(8).unwrap();
    let vel = world.register_component(8).unwrap();

    let mut spawned = Vec::new();
    for i in 0..16 {
        let entity = world.spawn();
        world
            .add(entity, pos, Position { x: i as f32, y: 0.0 })
            .unwrap();
        if i % 2 == 0 {
            world
                .add(entity, vel, Velocity { x: i as f32, y: 1.0 })
                .unwrap();
        }
        spawned.push((entity, i));
    }
    let targets: Vec<(Entity, usize)> = spawned.iter().copied().step_by(3).collect();
    for (entity, i) in targets {
        if i % 2 == 0 {
            world.remove_component(entity, vel).unwrap();
        } else {
            world.despawn(entity).unwrap();
            spawned.retain(|&(survivor, _)| survivor != entity);
        }
    }

    // Every surviving entity's record still points at its own row and its
    // payload still matches what was written for it.
    for &(entity, i) in &spawned {
        let location = world.location(entity).unwrap();
        assert_eq!(
            world.archetype_entities(location.archetype)[location.row],
            entity
        );
        assert_eq!(
            world.get::<Position>(entity, pos).unwrap().x,
            i as f32
        );
    }
}
