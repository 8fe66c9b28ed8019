//! # World: ownership and orchestration of the entity/component store
//!
//! This module defines [`World`], the single value that owns every piece of
//! store state: the component registry, the component index, the entity
//! table, all archetypes, and the signature→archetype map. There are no
//! process-wide singletons; every mutating operation takes `&mut World`
//! explicitly.
//!
//! ## Mutation engine
//!
//! Component add/remove is implemented as an archetype migration:
//!
//! 1. Validate everything up front (component registered, byte length,
//!    entity alive) so a failed call commits nothing.
//! 2. Compute the new signature and resolve its archetype, creating it on
//!    first use (idempotent).
//! 3. Move the entity's row: surviving components are copied column to
//!    column, the added component (if any) is written from the caller's
//!    bytes, and the vacated source row is compacted by swap-with-last.
//! 4. Patch the record of the entity relocated by the swap, then the record
//!    of the migrated entity.
//!
//! Replacing a component the entity already has is **not** a migration: the
//! bytes are copied into the existing slot in place and no archetype
//! changes.
//!
//! ## Concurrency and aliasing
//!
//! The world is single-threaded by construction: no locks, no atomics, no
//! re-entrancy. Borrowed component views returned by the access methods are
//! tied to the world borrow, so the borrow checker statically rules out
//! structural mutation while a view into an archetype's columns is live.

use std::collections::HashMap;

use bytemuck::Pod;

use crate::engine::archetype::Archetype;
use crate::engine::component::{ComponentIndex, ComponentRegistry};
use crate::engine::entity::{Entities, EntityLocation};
use crate::engine::error::{EcsError, EcsResult};
use crate::engine::storage::Column;
use crate::engine::types::{
    build_signature, ArchetypeId, ComponentId, Entity, Signature, COLUMN_ALIGN,
};

/// The entity/component store.
///
/// Owns all archetypes, all component columns, and the entity table.
/// Component data is opaque bytes copied by value; the world never
/// interprets it beyond the registered element size.
pub struct World {
    registry: ComponentRegistry,
    index: ComponentIndex,
    entities: Entities,
    archetypes: Vec<Archetype>,
    signature_map: HashMap<Signature, ArchetypeId>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world.
    ///
    /// The empty-signature archetype is created eagerly so spawning never
    /// fails: every new entity starts there with no components.
    pub fn new() -> Self {
        let empty = Archetype::new(0, Signature::empty(), Vec::new());
        let mut signature_map = HashMap::new();
        signature_map.insert(Signature::empty(), 0);
        Self {
            registry: ComponentRegistry::new(),
            index: ComponentIndex::new(),
            entities: Entities::new(),
            archetypes: vec![empty],
            signature_map,
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Registers a new component type of `size` bytes and returns its ID.
    ///
    /// IDs are assigned sequentially and never reused. Registration also
    /// allocates the component's (initially empty) index map.
    ///
    /// ## Errors
    /// - [`EcsError::ZeroSizedComponent`] if `size == 0`.
    /// - [`EcsError::Capacity`] if the component table is full.
    pub fn register_component(&mut self, size: usize) -> EcsResult<ComponentId> {
        let component = self.registry.register(size)?;
        self.index.push_component();
        Ok(component)
    }

    /// Returns the registered element size of `component`, if any.
    pub fn component_size(&self, component: ComponentId) -> Option<usize> {
        self.registry.size_of(component)
    }

    /// Returns the number of registered components.
    pub fn component_count(&self) -> usize {
        self.registry.len()
    }

    // ------------------------------------------------------------------
    // Entity lifecycle
    // ------------------------------------------------------------------

    /// Creates a new entity with an empty signature.
    ///
    /// The handle may be a recycled integer from an earlier despawn; the
    /// record always starts clean.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.entities.allocate();
        let row = self.archetypes[0].push_entity(entity);
        self.entities.set_record(entity, Signature::empty(), 0, row);
        entity
    }

    /// Destroys an entity, dropping its component data and returning its
    /// integer to the free pool.
    ///
    /// ## Errors
    /// [`EcsError::InvalidEntity`] if the handle is dead or unknown.
    pub fn despawn(&mut self, entity: Entity) -> EcsResult<()> {
        let record = self.entities.record(entity)?;
        let EntityLocation { archetype, row } = record.location;
        let swapped = self.archetypes[archetype as usize].swap_remove_row(row);
        if let Some(moved) = swapped {
            self.entities.set_row(moved, row);
        }
        self.entities.release(entity);
        Ok(())
    }

    /// Returns `true` if `entity` refers to a currently active record.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.active_count()
    }

    // ------------------------------------------------------------------
    // Component mutation
    // ------------------------------------------------------------------

    /// Attaches a component to an entity, or replaces it if already present.
    ///
    /// ## Behavior
    /// - **Replace**: if the entity's signature already has `component`, the
    ///   bytes are copied into the existing column slot; no migration.
    /// - **Add**: otherwise the entity migrates to the archetype for its
    ///   extended signature, carrying all existing component data.
    ///
    /// ## Errors
    /// All detected before any storage is touched:
    /// - [`EcsError::InvalidComponent`] for an unregistered ID.
    /// - [`EcsError::SizeMismatch`] if `bytes` is not the registered size.
    /// - [`EcsError::InvalidEntity`] for a dead handle.
    pub fn add_component(
        &mut self,
        entity: Entity,
        component: ComponentId,
        bytes: &[u8],
    ) -> EcsResult<()> {
        let size = self
            .registry
            .size_of(component)
            .ok_or(EcsError::InvalidComponent(component))?;
        if bytes.len() != size {
            return Err(EcsError::SizeMismatch {
                component,
                expected: size,
                got: bytes.len(),
            });
        }
        let record = self.entities.record(entity)?;

        if record.signature.has(component) {
            let position = self.column_position(component, &record.signature);
            let archetype = &mut self.archetypes[record.location.archetype as usize];
            match archetype.column_mut(position).row_mut(record.location.row) {
                Some(slot) => slot.copy_from_slice(bytes),
                None => unreachable!("entity record points past column length"),
            }
            return Ok(());
        }

        let mut new_signature = record.signature;
        new_signature.set(component);
        let destination_id = self.get_or_create_archetype(new_signature)?;

        let source_id = record.location.archetype;
        let (source, destination) = self.archetype_pair_mut(source_id, destination_id);
        let (new_row, swapped) =
            source.move_row_to(destination, record.location.row, Some((component, bytes)));

        if let Some(moved) = swapped {
            self.entities.set_row(moved, record.location.row);
        }
        self.entities
            .set_record(entity, new_signature, destination_id, new_row);
        log::trace!(
            "{} migrated to archetype {} (added component {})",
            entity,
            destination_id,
            component
        );
        Ok(())
    }

    /// Detaches a component from an entity, dropping its data.
    ///
    /// Symmetric to [`World::add_component`]: the entity migrates to the
    /// archetype for its reduced signature with the same row-alignment and
    /// compaction discipline.
    ///
    /// ## Errors
    /// - [`EcsError::InvalidComponent`] for an unregistered ID.
    /// - [`EcsError::InvalidEntity`] for a dead handle.
    /// - [`EcsError::MissingComponent`] if the entity does not have it.
    pub fn remove_component(&mut self, entity: Entity, component: ComponentId) -> EcsResult<()> {
        if self.registry.size_of(component).is_none() {
            return Err(EcsError::InvalidComponent(component));
        }
        let record = self.entities.record(entity)?;
        if !record.signature.has(component) {
            return Err(EcsError::MissingComponent { entity, component });
        }

        let mut new_signature = record.signature;
        new_signature.clear(component);
        let destination_id = self.get_or_create_archetype(new_signature)?;

        let source_id = record.location.archetype;
        let (source, destination) = self.archetype_pair_mut(source_id, destination_id);
        let (new_row, swapped) = source.move_row_to(destination, record.location.row, None);

        if let Some(moved) = swapped {
            self.entities.set_row(moved, record.location.row);
        }
        self.entities
            .set_record(entity, new_signature, destination_id, new_row);
        log::trace!(
            "{} migrated to archetype {} (removed component {})",
            entity,
            destination_id,
            component
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Component access
    // ------------------------------------------------------------------

    /// Returns `true` if the entity currently has `component`.
    ///
    /// Pure signature test; no column lookup.
    pub fn has_component(&self, entity: Entity, component: ComponentId) -> EcsResult<bool> {
        if self.registry.size_of(component).is_none() {
            return Err(EcsError::InvalidComponent(component));
        }
        let record = self.entities.record(entity)?;
        Ok(record.signature.has(component))
    }

    /// Borrows the raw bytes of one component of one entity.
    ///
    /// The view is valid only while no structural mutation occurs; the
    /// borrow on the world enforces that statically.
    pub fn component_bytes(&self, entity: Entity, component: ComponentId) -> EcsResult<&[u8]> {
        let (archetype, position, row) = self.resolve(entity, component)?;
        match self.archetypes[archetype as usize].column(position).row(row) {
            Some(bytes) => Ok(bytes),
            None => unreachable!("entity record points past column length"),
        }
    }

    /// Mutably borrows the raw bytes of one component of one entity.
    pub fn component_bytes_mut(
        &mut self,
        entity: Entity,
        component: ComponentId,
    ) -> EcsResult<&mut [u8]> {
        let (archetype, position, row) = self.resolve(entity, component)?;
        match self.archetypes[archetype as usize]
            .column_mut(position)
            .row_mut(row)
        {
            Some(bytes) => Ok(bytes),
            None => unreachable!("entity record points past column length"),
        }
    }

    /// Validates an access and resolves `(archetype, column position, row)`.
    fn resolve(
        &self,
        entity: Entity,
        component: ComponentId,
    ) -> EcsResult<(ArchetypeId, usize, usize)> {
        if self.registry.size_of(component).is_none() {
            return Err(EcsError::InvalidComponent(component));
        }
        let record = self.entities.record(entity)?;
        if !record.signature.has(component) {
            return Err(EcsError::MissingComponent { entity, component });
        }
        let position = self.column_position(component, &record.signature);
        Ok((record.location.archetype, position, record.location.row))
    }

    /// Index lookup that must succeed once the signature bit is known set.
    fn column_position(&self, component: ComponentId, signature: &Signature) -> usize {
        match self.index.column_of(component, signature) {
            Some(position) => position,
            None => unreachable!("component index missing entry for component {}", component),
        }
    }

    // ------------------------------------------------------------------
    // Typed access layer
    // ------------------------------------------------------------------

    /// Typed counterpart of [`World::add_component`].
    ///
    /// `T` must be plain-old-data with the registered size and alignment at
    /// most [`COLUMN_ALIGN`].
    pub fn add<T: Pod>(&mut self, entity: Entity, component: ComponentId, value: T) -> EcsResult<()> {
        self.check_layout::<T>(component)?;
        self.add_component(entity, component, bytemuck::bytes_of(&value))
    }

    /// Borrows one component as `&T`.
    pub fn get<T: Pod>(&self, entity: Entity, component: ComponentId) -> EcsResult<&T> {
        self.check_layout::<T>(component)?;
        Ok(bytemuck::from_bytes(self.component_bytes(entity, component)?))
    }

    /// Borrows one component as `&mut T`.
    pub fn get_mut<T: Pod>(&mut self, entity: Entity, component: ComponentId) -> EcsResult<&mut T> {
        self.check_layout::<T>(component)?;
        Ok(bytemuck::from_bytes_mut(
            self.component_bytes_mut(entity, component)?,
        ))
    }

    /// Checks that `T` matches the registered element size.
    ///
    /// ## Panics
    /// Panics if `align_of::<T>()` exceeds [`COLUMN_ALIGN`]; such a type can
    /// never be stored correctly, so this is a misuse of the typed layer
    /// rather than a runtime condition.
    fn check_layout<T: Pod>(&self, component: ComponentId) -> EcsResult<()> {
        assert!(
            std::mem::align_of::<T>() <= COLUMN_ALIGN,
            "component type alignment exceeds column alignment"
        );
        let size = self
            .registry
            .size_of(component)
            .ok_or(EcsError::InvalidComponent(component))?;
        if std::mem::size_of::<T>() != size {
            return Err(EcsError::SizeMismatch {
                component,
                expected: size,
                got: std::mem::size_of::<T>(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Returns every live entity whose signature contains all of
    /// `required`.
    ///
    /// Results are ordered by archetype creation order, then row order
    /// within an archetype. No ordering guarantee holds across calls if the
    /// archetype set changed in between.
    pub fn query(&self, required: &[ComponentId]) -> EcsResult<Vec<Entity>> {
        for &component in required {
            if self.registry.size_of(component).is_none() {
                return Err(EcsError::InvalidComponent(component));
            }
        }
        Ok(self.query_signature(&build_signature(required)))
    }

    /// Signature-level query; `need` must be built from registered IDs.
    pub fn query_signature(&self, need: &Signature) -> Vec<Entity> {
        let mut matched = Vec::new();
        for archetype in &self.archetypes {
            if archetype.matches(need) {
                matched.extend_from_slice(archetype.entities());
            }
        }
        matched
    }

    // ------------------------------------------------------------------
    // Archetype registry
    // ------------------------------------------------------------------

    /// Resolves the archetype for `signature`, creating it on first use.
    ///
    /// On creation, one empty column is allocated per set bit (element size
    /// from the registry, column numbers in ascending bit order) and a
    /// component-index entry is recorded for each.
    ///
    /// Idempotent: a second call with the same signature returns the same
    /// archetype.
    ///
    /// ## Panics
    /// Panics if creating the archetype would exhaust the
    /// [`ArchetypeId`] space.
    pub fn get_or_create_archetype(&mut self, signature: Signature) -> EcsResult<ArchetypeId> {
        if let Some(&id) = self.signature_map.get(&signature) {
            return Ok(id);
        }
        // A truncated ID would alias two signatures in the map.
        assert!(
            self.archetypes.len() <= ArchetypeId::MAX as usize,
            "archetype id space exhausted"
        );

        let mut columns = Vec::with_capacity(signature.count());
        for component in signature.iter() {
            let size = self
                .registry
                .size_of(component)
                .ok_or(EcsError::InvalidComponent(component))?;
            columns.push((component, Column::new(size)));
        }

        let id = self.archetypes.len() as ArchetypeId;
        for (column, &(component, _)) in columns.iter().enumerate() {
            self.index.record(component, signature, column);
        }
        self.archetypes.push(Archetype::new(id, signature, columns));
        self.signature_map.insert(signature, id);
        log::debug!(
            "created archetype {} with {} columns",
            id,
            signature.count()
        );
        Ok(id)
    }

    /// Mutably borrows two distinct archetypes at once.
    fn archetype_pair_mut(
        &mut self,
        a: ArchetypeId,
        b: ArchetypeId,
    ) -> (&mut Archetype, &mut Archetype) {
        assert!(a != b, "source and destination archetype must differ");
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.archetypes.split_at_mut(high as usize);
        let low_ref = &mut head[low as usize];
        let high_ref = &mut tail[0];
        if a < b {
            (low_ref, high_ref)
        } else {
            (high_ref, low_ref)
        }
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Returns where an entity's row currently lives.
    pub fn location(&self, entity: Entity) -> EcsResult<EntityLocation> {
        Ok(self.entities.record(entity)?.location)
    }

    /// Returns the current signature of an entity.
    pub fn signature_of(&self, entity: Entity) -> EcsResult<Signature> {
        Ok(self.entities.record(entity)?.signature)
    }

    /// Row-aligned entity array of one archetype.
    pub fn archetype_entities(&self, archetype: ArchetypeId) -> &[Entity] {
        self.archetypes[archetype as usize].entities()
    }

    /// Number of archetypes created so far (including the empty one).
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }
}
