//! Error types for entity allocation and component pool access.
//!
//! This module declares the complete failure taxonomy of the registry. Every
//! fallible public operation surfaces exactly one of these kinds to its
//! immediate caller; nothing is recovered internally, and validation always
//! precedes mutation, so a failing operation leaves the registry unchanged.
//!
//! ## Goals
//! * **Specificity:** Each variant models a single failure mode (stale
//!   entity handle, duplicate component, missing pool, exhausted id space).
//! * **Ergonomics:** The error implements [`std::error::Error`] and
//!   [`fmt::Display`], and every registry operation returns the
//!   [`RegistryResult`] alias so callers can bubble failures with `?`.
//! * **Actionability:** Structured fields (the offending component's type
//!   name, the capacity that was exhausted) make logs useful without
//!   reproducing the issue.
//!
//! ## Display vs. Debug
//! * [`fmt::Display`] is optimized for operator logs (short, single-line).
//! * [`fmt::Debug`] (derived) retains full structure for diagnostics.

use std::fmt;

/// Result alias used by every fallible registry operation.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// A failure surfaced by a registry operation.
///
/// The set of kinds is closed: violated *internal* preconditions (such as a
/// sparse-set removal of an absent entity) are not represented here because
/// the registry validates before every mutation; they are treated as fatal
/// assertion failures instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The entity handle does not name a live entity: it was never spawned,
    /// it has been discarded, or its generation is stale.
    InvalidEntity,

    /// `add` was called for a component the entity already holds.
    EntityInPool {
        /// Type name of the offending component.
        component: &'static str,
    },

    /// The pool for the component exists, but does not contain the entity.
    EntityNotInPool {
        /// Type name of the offending component.
        component: &'static str,
    },

    /// No pool for the component has ever been created in this registry.
    ///
    /// Only `get`, `modify`, and `remove` style operations raise this kind;
    /// `add` materialises the pool instead.
    PoolDoesNotExist {
        /// Type name of the offending component.
        component: &'static str,
    },

    /// The entity table is full: every id below the reserved null id is in
    /// use, live or parked on the free list.
    MaxEntitiesReached {
        /// Maximum number of entities the layout can address.
        capacity: u64,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::InvalidEntity => f.write_str("stale or dead entity reference"),
            RegistryError::EntityInPool { component } => {
                write!(f, "entity already holds a {component} component")
            }
            RegistryError::EntityNotInPool { component } => {
                write!(f, "entity holds no {component} component")
            }
            RegistryError::PoolDoesNotExist { component } => {
                write!(f, "no pool exists for component {component}")
            }
            RegistryError::MaxEntitiesReached { capacity } => {
                write!(f, "entity limit reached (capacity {capacity})")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
