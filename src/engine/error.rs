//! Error types for the entity/component store.
//!
//! This module declares focused, composable error types used across the
//! entity–component storage and mutation pipeline. Each error carries enough
//! context to make failures actionable while remaining small and cheap to
//! pass around or convert into the aggregate [`EcsError`].
//!
//! ## Goals
//! * **Specificity:** Each variant models a single failure mode (e.g.
//!   unregistered component IDs, stale entity handles, registry capacity).
//! * **Ergonomics:** All errors implement [`std::error::Error`] and
//!   [`fmt::Display`], and provide `From<T>` conversions into [`EcsError`].
//! * **Actionability:** Structured fields (offending entity, component ID,
//!   expected vs. actual sizes) make logs useful without reproducing the
//!   issue.
//!
//! ## Propagation policy
//! Every error in this module is a *caller contract violation*, not a
//! recoverable runtime condition: an unregistered component ID, a dead
//! entity handle, a byte buffer of the wrong length. The world detects all
//! of them **before committing any partial mutation**, so a returned error
//! never leaves an archetype or the entity table half-updated. There are no
//! retryable failure modes in this core.
//!
//! ## Display vs. Debug
//! * [`fmt::Display`] is optimized for operator logs (short, imperative
//!   phrasing).
//! * [`fmt::Debug`] (derived) retains full structure for diagnostics.

use std::fmt;

use crate::engine::types::{ComponentId, Entity};

/// Convenience alias for results produced by the store.
pub type EcsResult<T> = Result<T, EcsError>;

/// Returned when the component registry cannot accept another registration
/// because the compile-time component table is full.
///
/// ### Fields
/// * `registered` — Number of components already registered.
/// * `capacity` — The compile-time maximum ([`COMPONENT_CAP`]).
///
/// [`COMPONENT_CAP`]: crate::engine::types::COMPONENT_CAP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// Number of components already registered.
    pub registered: usize,

    /// Compile-time maximum number of component types.
    pub capacity: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "component table full ({} registered; capacity {})",
            self.registered, self.capacity
        )
    }
}

impl std::error::Error for CapacityError {}

/// Aggregate error for all store operations.
///
/// Every variant is a programmer error at the call site; none is transient.
/// Validation happens up front, so an `Err` return guarantees the world was
/// not modified by the failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// An unregistered component ID was used in add/get/has/remove/query.
    InvalidComponent(ComponentId),

    /// An entity handle does not refer to a currently active record.
    InvalidEntity(Entity),

    /// Component registration exceeded the compile-time maximum.
    Capacity(CapacityError),

    /// Attempted to register a component with a zero byte size.
    ZeroSizedComponent,

    /// A component read targeted an entity that does not currently hold
    /// that component (signature bit unset).
    MissingComponent {
        /// Entity that was addressed.
        entity: Entity,
        /// Component the entity does not have.
        component: ComponentId,
    },

    /// A component write supplied a byte buffer (or typed value) whose size
    /// does not match the registered element size.
    SizeMismatch {
        /// Component being written.
        component: ComponentId,
        /// Registered element size in bytes.
        expected: usize,
        /// Size of the value actually supplied.
        got: usize,
    },
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::InvalidComponent(component) => {
                write!(f, "component {} is not registered", component)
            }
            EcsError::InvalidEntity(entity) => {
                write!(f, "{} is dead or was never spawned", entity)
            }
            EcsError::Capacity(e) => write!(f, "{e}"),
            EcsError::ZeroSizedComponent => {
                f.write_str("cannot register a zero-sized component")
            }
            EcsError::MissingComponent { entity, component } => {
                write!(f, "{} does not have component {}", entity, component)
            }
            EcsError::SizeMismatch {
                component,
                expected,
                got,
            } => write!(
                f,
                "component {} expects {} bytes, got {}",
                component, expected, got
            ),
        }
    }
}

impl std::error::Error for EcsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EcsError::Capacity(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CapacityError> for EcsError {
    fn from(e: CapacityError) -> Self {
        EcsError::Capacity(e)
    }
}
