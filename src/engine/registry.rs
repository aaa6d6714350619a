//! # Registry
//!
//! The owning container that binds entity allocation to heterogeneous
//! component pools and enforces validity at every mutation.
//!
//! ## Purpose
//! The registry is the single entry point of the crate. It owns the entity
//! table, a map from component type to pool, and mediates every operation:
//! handing out and recycling identifiers, lazily materialising pools,
//! cascading component removal when an entity is destroyed, and surfacing
//! the failure taxonomy of [`RegistryError`].
//!
//! ## Design
//! - Pools live in a vector indexed by a compact [`ComponentID`], assigned
//!   by a monotonic counter at the first `add` of each component type and
//!   looked up through a `TypeId` key map. Pools are never dropped once
//!   created, so the type-to-pool mapping is stable for the registry's
//!   lifetime.
//! - Each pool entry pairs a [`ComponentDesc`] with the boxed storage. Code
//!   that knows the component type recovers the typed pool by downcast;
//!   cascading removal drives pools through the erased [`AbstractPool`]
//!   capabilities only.
//! - Validation precedes mutation in every public operation, so a failing
//!   call leaves the registry unchanged. Bulk operations apply element by
//!   element and make no transactional promise across elements.
//!
//! ## Invariants
//! - Components are attached only to live entities: discarding an entity
//!   evicts it from every pool before its slot reaches the free list.
//! - A pool's value array and identifier array stay the same length.
//!
//! ## Concurrency
//! A registry is a plain mutable container intended to be owned by one
//! logical actor at a time. Nothing blocks and nothing suspends; wrap the
//! registry in a lock externally if it must cross threads.
//!
//! [`AbstractPool`]: crate::engine::pool::AbstractPool

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use crate::engine::component::{Component, ComponentDesc, ComponentSet};
use crate::engine::entity::EntityTable;
use crate::engine::error::{RegistryError, RegistryResult};
use crate::engine::pool::{AbstractPool, Pool};
use crate::engine::types::{ComponentID, Entity, EntityKind};

/// One registered component pool: its descriptor plus the erased storage.
struct PoolEntry<E: EntityKind> {
    descriptor: ComponentDesc,
    storage: Box<dyn AbstractPool<E>>,
}

/// Entity-component registry over a fixed identifier layout.
///
/// ## Purpose
/// Creates, validates, and destroys entities; attaches, inspects, mutates,
/// and detaches component values of arbitrary types. The identifier layout
/// is fixed by the `E` type parameter at construction; the component type
/// set is open and grows as new types are first added.
///
/// ## Notes
/// Identifiers are opaque: store and compare them freely, but derive their
/// parts through [`id_of`]/[`generation_of`] rather than assuming a bit
/// layout.
///
/// [`id_of`]: Registry::id_of
/// [`generation_of`]: Registry::generation_of
pub struct Registry<E: EntityKind = Entity> {
    table: EntityTable<E>,
    by_type: HashMap<TypeId, ComponentID>,
    pools: Vec<PoolEntry<E>>,
}

impl<E: EntityKind> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityKind> Registry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            table: EntityTable::new(),
            by_type: HashMap::new(),
            pools: Vec::new(),
        }
    }

    // ── Entity lifecycle ────────────────────────────────────────────────

    /// Creates a new entity.
    ///
    /// ## Behavior
    /// Revives the most recently discarded id if any is free (its handle
    /// carries a bumped generation), otherwise appends a fresh id with
    /// generation zero.
    ///
    /// ## Errors
    /// `MaxEntitiesReached` when the id space of the layout is exhausted.
    pub fn create(&mut self) -> RegistryResult<E> {
        self.table.create()
    }

    /// Creates `count` entities in sequence order.
    ///
    /// Element-wise: on error, earlier creations remain applied.
    ///
    /// ## Panics
    /// Panics if `count` is zero.
    pub fn create_many(&mut self, count: usize) -> RegistryResult<Vec<E>> {
        assert!(count > 0, "create_many requires a positive count");
        let mut entities = Vec::with_capacity(count);
        for _ in 0..count {
            entities.push(self.table.create()?);
        }
        Ok(entities)
    }

    /// Destroys an entity.
    ///
    /// ## Behavior
    /// Evicts the entity from every pool that holds it, then parks its slot
    /// on the free list with the generation bumped, invalidating every
    /// outstanding handle.
    ///
    /// ## Errors
    /// `InvalidEntity` if the handle is not live.
    pub fn discard(&mut self, entity: E) -> RegistryResult<()> {
        if !self.table.is_valid(entity) {
            return Err(RegistryError::InvalidEntity);
        }
        self.evict_from_all(entity);
        self.table.release(entity);
        Ok(())
    }

    /// Returns `true` iff `entity` names a live entity with a current
    /// generation.
    #[inline]
    pub fn is_valid(&self, entity: E) -> bool {
        self.table.is_valid(entity)
    }

    /// Returns `true` iff `entity`'s id has ever been handed out by this
    /// registry, live or not.
    #[inline]
    pub fn has_spawned(&self, entity: E) -> bool {
        self.table.has_spawned(entity)
    }

    /// Returns the id subfield of `entity`.
    #[inline]
    pub fn id_of(&self, entity: E) -> u64 {
        entity.id()
    }

    /// Returns the generation subfield of `entity`.
    #[inline]
    pub fn generation_of(&self, entity: E) -> u64 {
        entity.generation()
    }

    /// Returns the generation currently stored in `entity`'s table slot.
    ///
    /// For a discarded entity this is the generation its id will carry when
    /// revived, not the stale generation of the handle.
    ///
    /// ## Errors
    /// `InvalidEntity` if the entity never spawned.
    pub fn current_generation_of(&self, entity: E) -> RegistryResult<u64> {
        self.table
            .current_generation(entity)
            .ok_or(RegistryError::InvalidEntity)
    }

    /// Returns the number of ids ever handed out, live or dead.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.table.len()
    }

    /// Returns the number of live entities. O(discarded).
    #[inline]
    pub fn alive_count(&self) -> usize {
        self.table.alive()
    }

    /// Iterates every live entity in id order.
    pub fn live_entities(&self) -> impl Iterator<Item = E> + '_ {
        self.table.live()
    }

    /// Discards every live entity, cascading component removal as usual.
    ///
    /// Pools stay registered and every freed id lands on the free list with
    /// its generation bumped, exactly as if each entity had been discarded
    /// individually in id order.
    pub fn clear(&mut self) {
        let live: Vec<E> = self.table.live().collect();
        for entity in live {
            self.evict_from_all(entity);
            self.table.release(entity);
        }
    }

    // ── Single-component operations ─────────────────────────────────────

    /// Attaches `value` to `entity`, materialising the pool for `C` on its
    /// first use.
    ///
    /// ## Errors
    /// - `InvalidEntity` if the handle is not live.
    /// - `EntityInPool` if the entity already holds a `C`.
    pub fn add<C: Component>(&mut self, entity: E, value: C) -> RegistryResult<()> {
        if !self.table.is_valid(entity) {
            return Err(RegistryError::InvalidEntity);
        }
        let pool = self.pool_or_insert::<C>();
        if pool.contains(entity) {
            return Err(RegistryError::EntityInPool {
                component: type_name::<C>(),
            });
        }
        pool.insert(entity, value);
        Ok(())
    }

    /// Attaches `C`'s default value to `entity`.
    ///
    /// ## Errors
    /// As for [`add`](Registry::add).
    pub fn add_default<C: Component>(&mut self, entity: E) -> RegistryResult<()> {
        self.add(entity, C::default())
    }

    /// Returns the `C` value attached to `entity`.
    ///
    /// ## Errors
    /// - `InvalidEntity` if the handle is not live.
    /// - `PoolDoesNotExist` if no `C` was ever added to this registry.
    /// - `EntityNotInPool` if the pool exists but skips this entity.
    pub fn get<C: Component>(&self, entity: E) -> RegistryResult<&C> {
        if !self.table.is_valid(entity) {
            return Err(RegistryError::InvalidEntity);
        }
        let pool = self.pool_ref::<C>().ok_or(RegistryError::PoolDoesNotExist {
            component: type_name::<C>(),
        })?;
        pool.value(entity).ok_or(RegistryError::EntityNotInPool {
            component: type_name::<C>(),
        })
    }

    /// Returns the `C` value attached to `entity` mutably.
    ///
    /// The reference is invalidated by the next mutation of the `C` pool;
    /// the borrow checker enforces at least that conservatively, since the
    /// whole registry stays mutably borrowed.
    ///
    /// ## Errors
    /// As for [`get`](Registry::get).
    pub fn get_mut<C: Component>(&mut self, entity: E) -> RegistryResult<&mut C> {
        if !self.table.is_valid(entity) {
            return Err(RegistryError::InvalidEntity);
        }
        let pool = self
            .pool_mut_ref::<C>()
            .ok_or(RegistryError::PoolDoesNotExist {
                component: type_name::<C>(),
            })?;
        pool.value_mut(entity).ok_or(RegistryError::EntityNotInPool {
            component: type_name::<C>(),
        })
    }

    /// Overwrites the `C` value attached to `entity`.
    ///
    /// ## Errors
    /// As for [`get`](Registry::get).
    pub fn modify<C: Component>(&mut self, entity: E, value: C) -> RegistryResult<()> {
        *self.get_mut::<C>(entity)? = value;
        Ok(())
    }

    /// Detaches the `C` value from `entity`.
    ///
    /// The pool swap-removes: the last value moves into the vacated dense
    /// slot, so dense order is not preserved.
    ///
    /// ## Errors
    /// As for [`get`](Registry::get).
    pub fn remove<C: Component>(&mut self, entity: E) -> RegistryResult<()> {
        if !self.table.is_valid(entity) {
            return Err(RegistryError::InvalidEntity);
        }
        let pool = self
            .pool_mut_ref::<C>()
            .ok_or(RegistryError::PoolDoesNotExist {
                component: type_name::<C>(),
            })?;
        if !pool.contains(entity) {
            return Err(RegistryError::EntityNotInPool {
                component: type_name::<C>(),
            });
        }
        pool.remove(entity);
        Ok(())
    }

    /// Returns `true` iff `entity` is live and holds a `C`.
    ///
    /// Total: an invalid entity, a missing pool, and an absent value all
    /// report `false`.
    pub fn contains<C: Component>(&self, entity: E) -> bool {
        self.table.is_valid(entity)
            && self
                .pool_ref::<C>()
                .is_some_and(|pool| pool.contains(entity))
    }

    /// Returns `true` iff `entity` is live and holds a `C` structurally
    /// equal to `value`.
    ///
    /// Equality is `PartialEq`, so floating-point fields follow IEEE
    /// semantics: a stored `NaN` never matches.
    pub fn contains_value<C: Component>(&self, entity: E, value: &C) -> bool {
        self.table.is_valid(entity)
            && self
                .pool_ref::<C>()
                .and_then(|pool| pool.value(entity))
                .is_some_and(|stored| stored == value)
    }

    // ── Multi-component operations ──────────────────────────────────────

    /// Returns `true` iff `entity` holds every component in the tuple `S`.
    pub fn contains_all<S: ComponentSet<E>>(&self, entity: E) -> bool {
        S::contains_all(self, entity)
    }

    /// Returns `true` iff `entity` holds at least one component in the
    /// tuple `S`.
    pub fn contains_any<S: ComponentSet<E>>(&self, entity: E) -> bool {
        S::contains_any(self, entity)
    }

    /// Attaches the default value of every component in the tuple `S`.
    ///
    /// Element-wise in tuple order: on error, earlier additions remain.
    ///
    /// ## Errors
    /// As for [`add`](Registry::add), per element.
    pub fn add_defaults<S: ComponentSet<E>>(&mut self, entity: E) -> RegistryResult<()> {
        S::add_defaults(self, entity)
    }

    /// Detaches every component in the tuple `S`.
    ///
    /// Element-wise in tuple order: on error, earlier removals remain.
    ///
    /// ## Errors
    /// As for [`remove`](Registry::remove), per element.
    pub fn remove_set<S: ComponentSet<E>>(&mut self, entity: E) -> RegistryResult<()> {
        S::remove_from(self, entity)
    }

    /// Detaches every component `entity` holds, leaving it live and bare.
    ///
    /// Emptied pools stay registered; the type-to-pool mapping is stable.
    ///
    /// ## Errors
    /// `InvalidEntity` if the handle is not live.
    pub fn remove_all(&mut self, entity: E) -> RegistryResult<()> {
        if !self.table.is_valid(entity) {
            return Err(RegistryError::InvalidEntity);
        }
        self.evict_from_all(entity);
        Ok(())
    }

    // ── Bulk operations over entity lists ───────────────────────────────

    /// Attaches a clone of `value` to each entity in order.
    ///
    /// Element-wise: on error, earlier additions remain applied.
    ///
    /// ## Errors
    /// As for [`add`](Registry::add), per element.
    pub fn add_many<C: Component + Clone>(
        &mut self,
        entities: &[E],
        value: C,
    ) -> RegistryResult<()> {
        for &entity in entities {
            self.add(entity, value.clone())?;
        }
        Ok(())
    }

    /// Detaches `C` from each entity in order.
    ///
    /// Element-wise: on error, earlier removals remain applied.
    ///
    /// ## Errors
    /// As for [`remove`](Registry::remove), per element.
    pub fn remove_many<C: Component>(&mut self, entities: &[E]) -> RegistryResult<()> {
        for &entity in entities {
            self.remove::<C>(entity)?;
        }
        Ok(())
    }

    /// Overwrites each entity's `C` with a clone of `value`, in order.
    ///
    /// Element-wise: on error, earlier writes remain applied.
    ///
    /// ## Errors
    /// As for [`get`](Registry::get), per element.
    pub fn modify_many<C: Component + Clone>(
        &mut self,
        entities: &[E],
        value: C,
    ) -> RegistryResult<()> {
        for &entity in entities {
            self.modify(entity, value.clone())?;
        }
        Ok(())
    }

    // ── Introspection ───────────────────────────────────────────────────

    /// Returns the number of pools ever materialised.
    #[inline]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Returns how many entities hold a `C`, or zero if the pool was never
    /// materialised.
    pub fn pool_len<C: Component>(&self) -> usize {
        self.pool_ref::<C>().map_or(0, |pool| pool.len())
    }

    /// Iterates every pool's descriptor and current length.
    pub fn pool_stats(&self) -> impl Iterator<Item = (&ComponentDesc, usize)> {
        self.pools
            .iter()
            .map(|entry| (&entry.descriptor, entry.storage.len()))
    }

    /// Returns the holders of `C` in dense order, or an empty slice if the
    /// pool was never materialised.
    ///
    /// Dense order is storage order: swap-removal reorders it freely.
    pub fn entities_with<C: Component>(&self) -> &[E] {
        self.pool_ref::<C>().map_or(&[], |pool| pool.entities())
    }

    /// Returns the stored `C` values in dense order, parallel to
    /// [`entities_with`](Registry::entities_with), or an empty slice if the
    /// pool was never materialised.
    pub fn values_of<C: Component>(&self) -> &[C] {
        self.pool_ref::<C>().map_or(&[], |pool| pool.values())
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Runs the erased removal over every pool containing `entity`.
    fn evict_from_all(&mut self, entity: E) {
        for entry in &mut self.pools {
            if entry.storage.contains_entity(entity) {
                entry.storage.evict(entity);
            }
        }
    }

    fn pool_ref<C: Component>(&self) -> Option<&Pool<E, C>> {
        let &id = self.by_type.get(&TypeId::of::<C>())?;
        let entry = &self.pools[id as usize];
        debug_assert!(entry.descriptor.stores::<C>());
        Some(
            entry
                .storage
                .as_any()
                .downcast_ref::<Pool<E, C>>()
                .expect("pool storage type mismatch"),
        )
    }

    fn pool_mut_ref<C: Component>(&mut self) -> Option<&mut Pool<E, C>> {
        let &id = self.by_type.get(&TypeId::of::<C>())?;
        let entry = &mut self.pools[id as usize];
        debug_assert!(entry.descriptor.stores::<C>());
        Some(
            entry
                .storage
                .as_any_mut()
                .downcast_mut::<Pool<E, C>>()
                .expect("pool storage type mismatch"),
        )
    }

    fn pool_or_insert<C: Component>(&mut self) -> &mut Pool<E, C> {
        let pools = &mut self.pools;
        let id = *self.by_type.entry(TypeId::of::<C>()).or_insert_with(|| {
            let id = pools.len();
            assert!(id <= ComponentID::MAX as usize, "component pool capacity exceeded");
            pools.push(PoolEntry {
                descriptor: ComponentDesc::describe::<C>(id as ComponentID),
                storage: Box::new(Pool::<E, C>::new()),
            });
            id as ComponentID
        });
        self.pools[id as usize]
            .storage
            .as_any_mut()
            .downcast_mut::<Pool<E, C>>()
            .expect("pool storage type mismatch")
    }
}
