//! # Component Registry and Component Index
//!
//! This module provides the two lookup structures that give the store its
//! O(1) component access:
//!
//! - [`ComponentRegistry`] assigns each component type a stable, sequential
//!   [`ComponentId`] and records its fixed element size in bytes.
//! - [`ComponentIndex`] maps, per component, an archetype signature to the
//!   column number holding that component's data inside that archetype.
//!
//! ## Design
//! - Components are registered once and assigned a compact ID in
//!   `[0, COMPONENT_CAP)`. IDs are never reused.
//! - The element size is fixed at registration and never changes; the store
//!   treats component data as opaque bytes of exactly that size.
//! - Index entries are created when an archetype is created and are never
//!   removed. This is a deliberate trade of memory for constant-time column
//!   lookup: without the index, every component access would scan the
//!   archetype's column list.
//!
//! ## Invariants
//! - `ComponentId` values are unique and stable for the lifetime of the
//!   world.
//! - The registry and the index grow in lockstep: registering component `n`
//!   allocates index map `n`.
//! - For every archetype containing component `c`, `column_of(c, signature)`
//!   resolves to the column number assigned at archetype creation.

use std::collections::HashMap;

use crate::engine::error::{CapacityError, EcsError, EcsResult};
use crate::engine::types::{ComponentId, Signature, COMPONENT_CAP};

/// Assigns stable IDs to component types and records their byte sizes.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    sizes: Vec<usize>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new component type of `size` bytes and returns its ID.
    ///
    /// ## Errors
    /// - [`EcsError::ZeroSizedComponent`] if `size == 0`.
    /// - [`EcsError::Capacity`] if the component table is full.
    ///
    /// On error no ID is consumed; the next successful registration still
    /// receives the next sequential ID.
    pub fn register(&mut self, size: usize) -> EcsResult<ComponentId> {
        if size == 0 {
            return Err(EcsError::ZeroSizedComponent);
        }
        if self.sizes.len() >= COMPONENT_CAP {
            return Err(CapacityError {
                registered: self.sizes.len(),
                capacity: COMPONENT_CAP,
            }
            .into());
        }

        let component = self.sizes.len() as ComponentId;
        self.sizes.push(size);
        log::debug!("registered component {} ({} bytes)", component, size);
        Ok(component)
    }

    /// Returns the element size of `component`, or `None` if unregistered.
    #[inline]
    pub fn size_of(&self, component: ComponentId) -> Option<usize> {
        self.sizes.get(component as usize).copied()
    }

    /// Returns the number of registered components.
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns `true` if no components are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Per-component map from archetype signature to column number.
///
/// Entries are append-only over the life of the world; an archetype never
/// changes its column layout after creation.
#[derive(Debug, Default)]
pub struct ComponentIndex {
    columns: Vec<HashMap<Signature, usize>>,
}

impl ComponentIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the (empty) per-component map for a newly registered
    /// component. Called once per registration, in ID order.
    pub fn push_component(&mut self) {
        self.columns.push(HashMap::new());
    }

    /// Records that inside the archetype identified by `signature`,
    /// `component`'s data lives in column `column`.
    pub fn record(&mut self, component: ComponentId, signature: Signature, column: usize) {
        debug_assert!((component as usize) < self.columns.len());
        self.columns[component as usize].insert(signature, column);
    }

    /// Resolves the column number of `component` inside the archetype
    /// identified by `signature`.
    #[inline]
    pub fn column_of(&self, component: ComponentId, signature: &Signature) -> Option<usize> {
        self.columns
            .get(component as usize)
            .and_then(|map| map.get(signature))
            .copied()
    }
}
