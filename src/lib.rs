//! # Entity Registry
//!
//! Sparse-set Entity-Component-System (ECS) registry with stable, versioned,
//! recyclable entity identifiers.
//!
//! ## Design Goals
//! - Dense, cache-friendly component storage with O(1) insert/lookup/remove
//! - Generational identifiers that detect stale handles after recycling
//! - An open component-type set with pools materialised on first use
//! - Compile-time identifier layouts so hot-path masking folds to constants
//!
//! ## Example
//! ```
//! use entity_registry::Registry;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Position {
//!     x: f32,
//!     y: f32,
//! }
//!
//! let mut registry: Registry = Registry::new();
//! let entity = registry.create()?;
//! registry.add(entity, Position { x: 1.0, y: 2.0 })?;
//! assert_eq!(registry.get::<Position>(entity)?, &Position { x: 1.0, y: 2.0 });
//! registry.discard(entity)?;
//! assert!(!registry.is_valid(entity));
//! # Ok::<(), entity_registry::RegistryError>(())
//! ```

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![deny(dead_code)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

// Core registry types

pub use engine::registry::Registry;

pub use engine::types::{
    ComponentID,
    Entity,
    EntityKind,
    LargeEntity,
    MediumEntity,
    SmallEntity,
    TinyEntity,
};

// Component machinery

pub use engine::component::{
    Component,
    ComponentDesc,
    ComponentSet,
};

pub use engine::pool::{AbstractPool, Pool};
pub use engine::sparse::SparseSet;

// Failure taxonomy

pub use engine::error::{RegistryError, RegistryResult};
