//! Archetypes: parallel component columns plus an entity row array.
//!
//! An archetype stores every entity that has exactly one component set. Its
//! layout is column-major: one [`Column`] per component in the signature,
//! ordered by ascending component ID, plus a parallel `Vec<Entity>` mapping
//! row index back to the entity handle.
//!
//! ## Row alignment
//!
//! The single invariant this module exists to preserve: for every column and
//! for the entity array, index `row` refers to the *same* logical entity.
//! All mutations move whole rows — every column and the entity array together
//! — and removal compacts by swap-with-last so storage stays dense. When a
//! swap relocates the former last row, the caller receives the relocated
//! entity so it can patch that entity's record.
//!
//! ## Migration
//!
//! [`Archetype::move_row_to`] transfers one entity's row into another
//! archetype: components present in both signatures are copied column to
//! column, a component being added is written from caller-supplied bytes,
//! and components absent from the destination are dropped when the source
//! row is swap-removed.

use crate::engine::storage::Column;
use crate::engine::types::{ArchetypeId, ComponentId, Entity, Signature};

/// Stores all entities sharing one exact component signature.
///
/// ## Invariants
/// - `component_ids` is sorted ascending and parallel to `columns`.
/// - Every column and `entities` have identical row counts.
/// - `signature` has exactly the bits in `component_ids`.
#[derive(Debug)]
pub struct Archetype {
    id: ArchetypeId,
    signature: Signature,
    component_ids: Vec<ComponentId>,
    columns: Vec<Column>,
    entities: Vec<Entity>,
}

impl Archetype {
    /// Creates an empty archetype from prepared columns.
    ///
    /// `columns` must be ordered by ascending component ID; the world builds
    /// them by iterating the signature's set bits.
    pub(crate) fn new(
        id: ArchetypeId,
        signature: Signature,
        columns: Vec<(ComponentId, Column)>,
    ) -> Self {
        debug_assert!(columns.windows(2).all(|pair| pair[0].0 < pair[1].0));
        debug_assert_eq!(columns.len(), signature.count());
        let (component_ids, columns) = columns.into_iter().unzip();
        Self {
            id,
            signature,
            component_ids,
            columns,
            entities: Vec::new(),
        }
    }

    /// Returns this archetype's stable identifier.
    #[inline]
    pub fn id(&self) -> ArchetypeId {
        self.id
    }

    /// Returns the component signature shared by all rows.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the number of entities stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the archetype holds no entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Row-aligned entity handles, densest-possible iteration order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns `true` if this archetype has every component in `need`.
    #[inline]
    pub fn matches(&self, need: &Signature) -> bool {
        self.signature.contains_all(need)
    }

    /// Finds the column position of `component` by scanning this
    /// archetype's own column list.
    #[inline]
    pub fn position_of(&self, component: ComponentId) -> Option<usize> {
        // Binary search is valid because component_ids is sorted ascending.
        self.component_ids.binary_search(&component).ok()
    }

    /// Returns the column at `position`.
    #[inline]
    pub fn column(&self, position: usize) -> &Column {
        &self.columns[position]
    }

    /// Returns the column at `position` mutably.
    #[inline]
    pub fn column_mut(&mut self, position: usize) -> &mut Column {
        &mut self.columns[position]
    }

    /// Appends an entity to an archetype with no columns (the empty
    /// signature), returning its row.
    ///
    /// Entities enter the world here; rows in non-empty archetypes are only
    /// ever created by migration.
    pub(crate) fn push_entity(&mut self, entity: Entity) -> usize {
        debug_assert!(self.columns.is_empty());
        self.entities.push(entity);
        self.entities.len() - 1
    }

    /// Moves the row at `row` into `destination`, returning the new row and
    /// the entity (if any) relocated into the vacated source slot.
    ///
    /// ## Behavior
    /// - For each destination column: if it is the component being `added`,
    ///   the supplied bytes are written; otherwise the data is copied from
    ///   this archetype's matching column.
    /// - The source row is then swap-removed from every column and the
    ///   entity array, dropping any component absent from the destination.
    ///
    /// All destination columns must agree on the appended row index; a
    /// disagreement means row alignment was already broken.
    pub(crate) fn move_row_to(
        &mut self,
        destination: &mut Archetype,
        row: usize,
        added: Option<(ComponentId, &[u8])>,
    ) -> (usize, Option<Entity>) {
        let entity = self.entities[row];
        let new_row = destination.entities.len();

        for (position, &component) in destination.component_ids.iter().enumerate() {
            let pushed = match added {
                Some((added_id, bytes)) if added_id == component => {
                    destination.columns[position].push(bytes)
                }
                _ => {
                    let source_position = match self.position_of(component) {
                        Some(position) => position,
                        None => unreachable!(
                            "destination requires component {} absent from source",
                            component
                        ),
                    };
                    destination.columns[position].push_from(&self.columns[source_position], row)
                }
            };
            debug_assert_eq!(pushed, new_row, "destination columns misaligned");
        }

        destination.entities.push(entity);
        let swapped = self.swap_remove_row(row);
        (new_row, swapped)
    }

    /// Removes the row at `row` from every column and the entity array.
    ///
    /// Returns the entity relocated into `row` by the swap, or `None` if
    /// the removed row was the last one.
    pub(crate) fn swap_remove_row(&mut self, row: usize) -> Option<Entity> {
        for column in &mut self.columns {
            column.swap_remove(row);
        }
        self.entities.swap_remove(row);
        self.entities.get(row).copied()
    }
}
