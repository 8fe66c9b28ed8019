//! # Engine Module
//!
//! Internal implementation of the entity/component store.
//!
//! This module contains all core building blocks:
//! - Signatures and handle types
//! - Entity table and handle recycling
//! - Type-erased columnar storage
//! - Archetypes and row migration
//! - The world (ownership, mutation, queries)
//! - Systems and the tick scheduler
//!
//! Public API exposure is controlled by `lib.rs`.

pub mod types;
pub mod error;
pub mod storage;
pub mod component;
pub mod entity;
pub mod archetype;
pub mod world;
pub mod systems;
