//! System execution model
//!
//! This module defines how per-tick logic runs over the world.
//!
//! A **system** is a unit of logic that operates on the entities matching a
//! declared component set. Systems:
//! - declare which components an entity must have to be processed,
//! - run once per tick, in registration order,
//! - receive full mutable access to the world plus the matched entity list.
//!
//! ## Execution model
//!
//! Execution is strictly single-threaded and deterministic. Each tick the
//! [`Scheduler`] walks its systems in the order they were registered; for
//! each one it queries the matching entities *fresh* and then invokes the
//! system. Because the query runs immediately before the invocation, a
//! system observes every structural change made by the systems that ran
//! before it in the same tick.
//!
//! A system is free to spawn, despawn, and add or remove components while it
//! runs; the entity slice it receives is a snapshot, so handles in it may be
//! dead by the time the system reaches them. [`World::is_alive`] is the
//! cheap guard for that case.
//!
//! ## Function-backed systems
//!
//! [`FnSystem`] wraps a closure so simple per-tick logic needs no dedicated
//! type. Anything stateful can implement [`System`] directly.

use crate::engine::error::EcsResult;
use crate::engine::types::{ComponentId, Entity};
use crate::engine::world::World;

/// A unit of per-tick logic operating on the world.
pub trait System {
    /// Human-readable name, used in logging.
    fn name(&self) -> &'static str;

    /// Components an entity must have for this system to see it.
    fn required(&self) -> &[ComponentId];

    /// Executes the system over the matched entities.
    ///
    /// `entities` is the query result taken just before this call; `dt` is
    /// the tick's timestep as passed to [`Scheduler::tick`].
    fn run(&mut self, world: &mut World, dt: f32, entities: &[Entity]);
}

/// A concrete [`System`] backed by a function or closure.
///
/// The closure receives the world, the timestep, and the matched entity
/// slice. `FnMut` is deliberate: a closure may carry mutable state across
/// ticks (counters, accumulators) without a custom system type.
pub struct FnSystem<F>
where
    F: FnMut(&mut World, f32, &[Entity]) + 'static,
{
    name: &'static str,
    required: Vec<ComponentId>,
    f: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut World, f32, &[Entity]) + 'static,
{
    /// Creates a new function-backed system.
    ///
    /// # Parameters
    /// - `name`: Human-readable name, useful for debugging.
    /// - `required`: Component IDs an entity must have to be matched.
    /// - `f`: The function or closure executed each tick.
    pub fn new(name: &'static str, required: Vec<ComponentId>, f: F) -> Self {
        Self { name, required, f }
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut World, f32, &[Entity]) + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn required(&self) -> &[ComponentId] {
        &self.required
    }

    fn run(&mut self, world: &mut World, dt: f32, entities: &[Entity]) {
        (self.f)(world, dt, entities)
    }
}

/// Runs registered systems against a world, once per tick, in registration
/// order.
///
/// The scheduler is deliberately separate from [`World`]: it borrows the
/// world only for the duration of a tick, so systems can take `&mut World`
/// without aliasing the scheduler's own state.
#[derive(Default)]
pub struct Scheduler {
    systems: Vec<Box<dyn System>>,
    ticks: u64,
}

impl Scheduler {
    /// Creates a scheduler with no systems.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a system; it will run after all previously registered ones.
    pub fn register(&mut self, system: Box<dyn System>) {
        log::debug!("registered system '{}'", system.name());
        self.systems.push(system);
    }

    /// Returns the number of registered systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no systems are registered.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one tick: each system in registration order, each against a
    /// fresh query of its required components.
    ///
    /// ## Errors
    /// [`EcsError::InvalidComponent`] if a system requires an unregistered
    /// component ID; systems before the failing one have already run.
    ///
    /// [`EcsError::InvalidComponent`]: crate::engine::error::EcsError::InvalidComponent
    pub fn tick(&mut self, world: &mut World, dt: f32) -> EcsResult<()> {
        for system in &mut self.systems {
            let entities = world.query(system.required())?;
            log::trace!(
                "tick {}: system '{}' over {} entities",
                self.ticks,
                system.name(),
                entities.len()
            );
            system.run(world, dt, &entities);
        }
        self.ticks += 1;
        Ok(())
    }
}
