//! Core ECS Types, Identifiers, and Bit-Level Layouts
//!
//! This module defines the **fundamental types, identifiers, and signatures**
//! used throughout the store. These definitions form the *semantic backbone*
//! of the system and are shared across all subsystems: entity management,
//! archetypes, queries, and system scheduling.
//!
//! ## Design Philosophy
//!
//! The store is designed around:
//!
//! - **Dense columnar storage**
//! - **Bitset-based signatures**
//! - **Stable numeric identifiers**
//!
//! To support these goals efficiently, this module:
//!
//! - Encodes entities as plain 32-bit handles that index the entity table,
//! - Represents component sets as fixed-size bit arrays,
//! - Uses small, copyable numeric IDs for all store concepts.
//!
//! ## Entity Representation
//!
//! Entities are bare indices into the entity table. A despawned entity's
//! index returns to a free pool and is handed out again by a later spawn;
//! liveness is tracked by an explicit active flag on the entity record, not
//! by a generation counter. Holding a handle across a despawn is a caller
//! contract violation and is reported as [`InvalidEntity`] by the world.
//!
//! [`InvalidEntity`]: crate::engine::error::EcsError::InvalidEntity
//!
//! ## Archetypes and Components
//!
//! Components are identified by compact [`ComponentId`] values bounded by
//! [`COMPONENT_CAP`]. Archetypes are described by [`Signature`] bitsets
//! indicating which components they contain.
//!
//! Component signatures:
//!
//! - are fixed-size arrays of `u64`,
//! - support fast bitwise subset comparison,
//! - allow efficient iteration over set bits,
//! - have value semantics (`Copy`, `Eq`, `Hash`) so they can key the
//!   archetype map directly.

use std::fmt;

/// Opaque handle identifying an entity in a [`World`](crate::engine::world::World).
///
/// Handles are recycled: after a despawn the same integer may be returned by
/// a later spawn. A live handle is unique among currently-active entities.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Entity(pub u32);

impl Entity {
    /// Returns the raw table index of this handle.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity {}", self.0)
    }
}

/// Unique identifier for a registered component type.
pub type ComponentId = u16;

/// Unique identifier for an archetype.
pub type ArchetypeId = u16;

/// Number of `u64` words in a [`Signature`].
pub const SIGNATURE_WORDS: usize = 4;

/// Maximum number of registered component types.
pub const COMPONENT_CAP: usize = SIGNATURE_WORDS * 64;

/// Maximum alignment (in bytes) a component type may require.
///
/// Column storage is backed by `u64` words, so any component whose alignment
/// is at most 8 can be borrowed in place through the typed access layer.
pub const COLUMN_ALIGN: usize = 8;

/// Bitset representing a set of components.
///
/// One bit per [`ComponentId`]. Two archetypes are distinct exactly when
/// their signatures differ, and an entity's signature always equals the
/// signature of the archetype it occupies.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Signature {
    words: [u64; SIGNATURE_WORDS],
}

impl Signature {
    /// Returns the empty signature (no components).
    #[inline]
    pub const fn empty() -> Self {
        Self {
            words: [0u64; SIGNATURE_WORDS],
        }
    }

    /// Sets the bit corresponding to `component`.
    ///
    /// ## Panics
    /// Panics if `component` is not below [`COMPONENT_CAP`].
    #[inline]
    pub fn set(&mut self, component: ComponentId) {
        debug_assert!((component as usize) < COMPONENT_CAP);
        let word = (component as usize) / 64;
        let bit = (component as usize) % 64;
        self.words[word] |= 1u64 << bit;
    }

    /// Clears the bit corresponding to `component`.
    ///
    /// ## Panics
    /// Panics if `component` is not below [`COMPONENT_CAP`].
    #[inline]
    pub fn clear(&mut self, component: ComponentId) {
        debug_assert!((component as usize) < COMPONENT_CAP);
        let word = (component as usize) / 64;
        let bit = (component as usize) % 64;
        self.words[word] &= !(1u64 << bit);
    }

    /// Returns `true` if `component` is present in this signature.
    ///
    /// ## Panics
    /// Panics if `component` is not below [`COMPONENT_CAP`].
    #[inline]
    pub fn has(&self, component: ComponentId) -> bool {
        debug_assert!((component as usize) < COMPONENT_CAP);
        let word = (component as usize) / 64;
        let bit = (component as usize) % 64;
        (self.words[word] >> bit) & 1 == 1
    }

    /// Returns `true` if every component in `other` is also present here.
    #[inline]
    pub fn contains_all(&self, other: &Signature) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(mine, theirs)| (mine & theirs) == *theirs)
    }

    /// Returns `true` if no bits are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Returns the number of components in this signature.
    #[inline]
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterates over all component IDs set in this signature, in ascending
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.words.iter().enumerate().flat_map(|(word_index, &word)| {
            let base = word_index * 64;
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some((base + tz) as ComponentId)
            })
        })
    }
}

/// Builds a signature from a list of component IDs.
///
/// ## Panics
/// Panics if any ID is not below [`COMPONENT_CAP`].
pub fn build_signature(components: &[ComponentId]) -> Signature {
    let mut signature = Signature::empty();
    for &component in components {
        signature.set(component);
    }
    signature
}
