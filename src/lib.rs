//! # Colonnade
//!
//! Archetype-based entity/component store with columnar, type-erased
//! storage.
//!
//! ## Design Goals
//! - Archetype storage for cache-friendly, dense iteration
//! - O(1) component access via a per-component column index
//! - Type-erased byte columns with an optional typed (`Pod`) layer on top
//! - Deterministic, single-threaded tick execution
//!
//! The store is a plain owned value: create a [`World`], register
//! components, spawn entities, and drive per-tick logic through a
//! [`Scheduler`]. There is no global state and no background thread.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use engine::world::World;

pub use engine::entity::EntityLocation;

pub use engine::systems::{FnSystem, Scheduler, System};

pub use engine::error::{CapacityError, EcsError, EcsResult};

pub use engine::types::{
    build_signature, ArchetypeId, ComponentId, Entity, Signature, COLUMN_ALIGN, COMPONENT_CAP,
    SIGNATURE_WORDS,
};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used store types.
///
/// Import with:
/// ```rust
/// use colonnade::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        build_signature, ComponentId, EcsError, EcsResult, Entity, FnSystem, Scheduler, Signature,
        System, World,
    };
}
