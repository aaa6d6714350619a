//! # Sparse Set
//!
//! A constant-time membership index from entity ids to dense positions,
//! paired with a packed array of full identifiers.
//!
//! ## Purpose
//! The sparse set is the storage primitive behind every component pool. It
//! answers "does this entity hold a slot, and where?" in O(1), keeps the
//! occupied slots packed for cache-friendly traversal, and removes in O(1)
//! by swapping the last element into the vacated slot.
//!
//! ## Design
//! - `sparse` is indexed by the *id* subfield and holds dense positions.
//!   It grows lazily to `id + 1` on insertion; gap entries hold a vacancy
//!   sentinel but may be treated as junk — correctness relies only on the
//!   three-way membership check, never on sentinel hygiene.
//! - `dense` holds the *full* identifiers, so a recycled id with a newer
//!   generation fails the membership check against a stale resident.
//!
//! ## Invariants
//! - `e` is a member iff `id(e) < len(sparse)`, `sparse[id(e)] < len(dense)`,
//!   and `dense[sparse[id(e)]] == e`.
//! - Every dense element's sparse entry points back at it.
//!
//! Removal leaves the departing entity's sparse entry untouched; the stale
//! value fails the membership check on the next lookup.

use crate::engine::types::EntityKind;

/// Sentinel written into sparse gaps opened by growth.
const VACANT: usize = usize::MAX;

/// Packed membership index over entity identifiers.
///
/// Insertion and removal preconditions are the caller's responsibility; the
/// registry validates before every call, so violations indicate a bug and
/// trip debug assertions here.
pub struct SparseSet<E: EntityKind> {
    sparse: Vec<usize>,
    dense: Vec<E>,
}

impl<E: EntityKind> Default for SparseSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityKind> SparseSet<E> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
        }
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if the set has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns the packed identifiers in dense order.
    #[inline]
    pub fn entities(&self) -> &[E] {
        &self.dense
    }

    /// Returns `true` iff `entity` is a member.
    ///
    /// Total: junk in sparse gaps, stale entries left by removal, and
    /// recycled ids with newer generations all fail one of the three checks.
    #[inline]
    pub fn contains(&self, entity: E) -> bool {
        match self.sparse.get(entity.id() as usize) {
            Some(&slot) => slot < self.dense.len() && self.dense[slot] == entity,
            None => false,
        }
    }

    /// Returns the dense position of `entity`, if it is a member.
    #[inline]
    pub fn position(&self, entity: E) -> Option<usize> {
        let slot = *self.sparse.get(entity.id() as usize)?;
        (slot < self.dense.len() && self.dense[slot] == entity).then_some(slot)
    }

    /// Adds `entity` to the set.
    ///
    /// Precondition: `!contains(entity)`.
    pub fn insert(&mut self, entity: E) {
        debug_assert!(!self.contains(entity), "sparse set double insert: {entity:?}");
        let index = entity.id() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, VACANT);
        }
        self.sparse[index] = self.dense.len();
        self.dense.push(entity);
    }

    /// Removes `entity` from the set and returns the dense slot it vacated,
    /// so parallel value arrays can mirror the same swap-remove.
    ///
    /// Precondition: `contains(entity)`.
    pub fn remove(&mut self, entity: E) -> usize {
        debug_assert!(self.contains(entity), "sparse set remove of absent {entity:?}");
        let slot = self.sparse[entity.id() as usize];
        self.dense.swap_remove(slot);
        // Repoint the moved resident, unless the removal hit the tail.
        if let Some(&moved) = self.dense.get(slot) {
            self.sparse[moved.id() as usize] = slot;
        }
        slot
    }
}
