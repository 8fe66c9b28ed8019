//! Entity table: per-entity records, liveness flags, and handle recycling.

use crate::engine::error::{EcsError, EcsResult};
use crate::engine::types::{ArchetypeId, Entity, Signature};

/// Where an entity's component data currently lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityLocation {
    /// Archetype holding the entity's row.
    pub archetype: ArchetypeId,
    /// Row index inside that archetype.
    pub row: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct EntityRecord {
    pub signature: Signature,
    pub active: bool,
    pub location: EntityLocation,
}

/// Entity table with a free pool for handle recycling.
///
/// A despawned handle's integer goes onto the pool and is handed back by a
/// later allocation; the record slot is reused, never freed. The record of
/// a recycled entity starts from a clean state (empty signature), so no data
/// from the previous occupant can leak through.
#[derive(Debug, Default)]
pub(crate) struct Entities {
    records: Vec<EntityRecord>,
    free_pool: Vec<u32>,
    active_count: usize,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a recycled handle if one is available, otherwise appends a
    /// fresh record slot. The record starts active with an empty signature;
    /// the caller assigns the location once the row exists.
    pub fn allocate(&mut self) -> Entity {
        let index = match self.free_pool.pop() {
            Some(index) => {
                self.records[index as usize] = EntityRecord {
                    active: true,
                    ..EntityRecord::default()
                };
                index
            }
            None => {
                let index = self.records.len() as u32;
                self.records.push(EntityRecord {
                    active: true,
                    ..EntityRecord::default()
                });
                index
            }
        };
        self.active_count += 1;
        Entity(index)
    }

    /// Retires a handle and returns its integer to the free pool.
    pub fn release(&mut self, entity: Entity) {
        let record = &mut self.records[entity.index()];
        debug_assert!(record.active, "released a dead entity");
        record.active = false;
        record.signature = Signature::empty();
        record.location = EntityLocation::default();
        self.free_pool.push(entity.0);
        self.active_count -= 1;
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.records
            .get(entity.index())
            .map(|record| record.active)
            .unwrap_or(false)
    }

    /// Returns a copy of the record, or `InvalidEntity` for dead or unknown
    /// handles.
    pub fn record(&self, entity: Entity) -> EcsResult<EntityRecord> {
        match self.records.get(entity.index()) {
            Some(record) if record.active => Ok(*record),
            _ => Err(EcsError::InvalidEntity(entity)),
        }
    }

    pub fn set_record(
        &mut self,
        entity: Entity,
        signature: Signature,
        archetype: ArchetypeId,
        row: usize,
    ) {
        debug_assert!(self.is_alive(entity));
        let record = &mut self.records[entity.index()];
        record.signature = signature;
        record.location = EntityLocation { archetype, row };
    }

    /// Patches only the row, used when a swap-remove relocates an entity
    /// within its archetype.
    pub fn set_row(&mut self, entity: Entity, row: usize) {
        debug_assert!(self.is_alive(entity));
        self.records[entity.index()].location.row = row;
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }
}
