//! # Entity Table
//!
//! This module defines entity identity, lifecycle, and the recycling scheme
//! used by the registry.
//!
//! ## Purpose
//! Entities are lightweight, opaque identifiers handed out by a dense table.
//! This module is responsible for:
//!
//! - Generating stable entity identifiers
//! - Tracking entity liveness via generation counters
//! - Recycling ids of destroyed entities through an embedded free list
//!
//! ## Entity Model
//! The table is a single contiguous array of identifiers indexed by id. Each
//! slot is in one of two states:
//!
//! - **Live**: the slot stores the entity itself, so validity is a single
//!   comparison against the caller's handle.
//! - **Dead**: the slot's id subfield stores the id of the next dead slot
//!   (the null id terminates the chain) and its generation subfield stores
//!   the generation to hand out when the slot is revived.
//!
//! There is no separate queue container — the free list threads through the
//! table itself, headed by `free_head`.
//!
//! ## Invariants
//! - A live slot `i` satisfies `id(slots[i]) == i`.
//! - The free-list chain is acyclic, duplicate-free, and visits every dead
//!   slot before terminating at the null id.
//! - Revival is LIFO: the most recently released id is reused first.
//!
//! ## Concurrency
//! The table is a plain mutable container; synchronization, if any, is the
//! owner's responsibility.

use crate::engine::error::{RegistryError, RegistryResult};
use crate::engine::types::EntityKind;

/// Dense entity table with an intrusive free list.
///
/// ## Design
/// - Creation revives the free-list head when one exists, otherwise appends
///   a fresh slot with generation zero.
/// - Release bumps the slot's generation (wrapping) and pushes it onto the
///   free list, invalidating every outstanding handle to the entity.
/// - A slot count equal to the null id means the id space is exhausted.
pub struct EntityTable<E: EntityKind> {
    slots: Vec<E>,
    free_head: u64,
}

impl<E: EntityKind> Default for EntityTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityKind> EntityTable<E> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: E::NULL_ID,
        }
    }

    /// Returns the number of slots ever allocated, live or dead.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no entity has ever been created.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of live entities by walking the free list.
    ///
    /// O(dead). The walk is bounded by the table length; exceeding it would
    /// mean a cycle in the free list and trips a debug assertion.
    pub fn alive(&self) -> usize {
        let mut dead = 0usize;
        let mut cursor = self.free_head;
        while cursor != E::NULL_ID {
            dead += 1;
            debug_assert!(dead <= self.slots.len(), "free list cycle");
            cursor = self.slots[cursor as usize].id();
        }
        self.slots.len() - dead
    }

    /// Creates a new entity.
    ///
    /// ## Behavior
    /// - Revives the free-list head if one exists: the slot keeps its id,
    ///   carries the generation parked in it at release time, and is
    ///   unlinked from the chain.
    /// - Otherwise appends a fresh slot with generation zero.
    ///
    /// ## Errors
    /// `MaxEntitiesReached` when every id below the reserved null id has
    /// been allocated and none is parked on the free list.
    pub fn create(&mut self) -> RegistryResult<E> {
        if self.free_head == E::NULL_ID {
            let index = self.slots.len() as u64;
            if index == E::NULL_ID {
                return Err(RegistryError::MaxEntitiesReached { capacity: E::NULL_ID });
            }
            let entity = E::compose(index, 0);
            self.slots.push(entity);
            Ok(entity)
        } else {
            let index = self.free_head;
            let parked = self.slots[index as usize];
            self.free_head = parked.id();
            let entity = E::compose(index, parked.generation());
            self.slots[index as usize] = entity;
            Ok(entity)
        }
    }

    /// Releases a live entity's slot onto the free list.
    ///
    /// The slot's generation is bumped (wrapping past the field maximum),
    /// so every outstanding handle to the entity becomes stale.
    ///
    /// Precondition: `is_valid(entity)`. The registry validates before
    /// calling.
    pub fn release(&mut self, entity: E) {
        debug_assert!(self.is_valid(entity), "release of invalid {entity:?}");
        let index = entity.id();
        let next_generation = E::next_generation(entity.generation());
        self.slots[index as usize] = E::compose(self.free_head, next_generation);
        self.free_head = index;
    }

    /// Iterates the identifiers of all live entities in id order.
    ///
    /// A slot is live exactly when its stored id matches its position; dead
    /// slots store a free-list link there instead.
    pub fn live(&self) -> impl Iterator<Item = E> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(index, slot)| slot.id() == *index as u64)
            .map(|(_, &slot)| slot)
    }

    /// Returns `true` iff `entity` names a live entity with a current
    /// generation.
    #[inline]
    pub fn is_valid(&self, entity: E) -> bool {
        match self.slots.get(entity.id() as usize) {
            Some(&slot) => slot == entity,
            None => false,
        }
    }

    /// Returns `true` iff `entity`'s id has ever been handed out.
    ///
    /// A discarded entity has still spawned; only its generation is stale.
    #[inline]
    pub fn has_spawned(&self, entity: E) -> bool {
        (entity.id() as usize) < self.slots.len()
    }

    /// Returns the generation currently stored in `entity`'s slot, or
    /// `None` if the entity never spawned.
    ///
    /// For a live entity this equals the handle's generation; for a dead
    /// slot it is the generation the next occupant will carry.
    #[inline]
    pub fn current_generation(&self, entity: E) -> Option<u64> {
        self.slots
            .get(entity.id() as usize)
            .map(|slot| slot.generation())
    }
}
