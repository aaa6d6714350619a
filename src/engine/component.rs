//! # Component Traits and Metadata
//!
//! This module defines what a component type is, the descriptor the registry
//! keeps per pool for diagnostics, and the tuple abstraction behind the
//! multi-component operations.
//!
//! ## Purpose
//! The set of component types is open: any plain value type with a default
//! and structural equality qualifies, and the first `add` of a new type
//! materialises its pool. Nothing is registered ahead of time and no global
//! state is involved — component identity is scoped to a registry instance.
//!
//! ## Component Sets
//! Multi-component operations (`contains_all`, `contains_any`, tuple add and
//! remove) are driven by [`ComponentSet`], implemented for tuples of
//! component types up to arity eight. The conjunction and disjunction
//! short-circuit left to right; the mutating forms apply element by element
//! in tuple order with no transactional guarantee across elements.

use std::any::{type_name, TypeId};
use std::fmt;
use std::mem::{align_of, size_of};

use crate::engine::error::RegistryResult;
use crate::engine::registry::Registry;
use crate::engine::types::{ComponentID, EntityKind};

/// Marker for types storable in a component pool.
///
/// Blanket-implemented for every plain value type: [`Default`] supplies the
/// value used by default-adding operations, and [`PartialEq`] is the
/// structural equality used by value-equality containment checks (IEEE
/// semantics on floating-point fields, so a stored `NaN` never matches).
pub trait Component: Default + PartialEq + Send + Sync + 'static {}

impl<T: Default + PartialEq + Send + Sync + 'static> Component for T {}

/// Diagnostic record for one pool: which component type it stores, under
/// which pool identifier, and how one stored value is laid out.
///
/// A descriptor is written once, when the registry materialises the pool,
/// and never changes afterwards; the `component_id` doubles as the pool's
/// first-observation rank, since identifiers are assigned in the order
/// component types are first added.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentDesc {
    /// Pool identifier; also the rank at which the type was first observed.
    pub component_id: ComponentID,

    /// Rust type name of the stored component.
    pub name: &'static str,

    /// Runtime type of the stored component.
    pub type_id: TypeId,

    /// Size in bytes of one stored value.
    pub value_size: usize,

    /// Alignment in bytes of one stored value.
    pub value_align: usize,
}

impl ComponentDesc {
    /// Describes the pool assigned `component_id`, storing values of type
    /// `C`.
    #[inline]
    pub fn describe<C: 'static>(component_id: ComponentID) -> Self {
        Self {
            component_id,
            name: type_name::<C>(),
            type_id: TypeId::of::<C>(),
            value_size: size_of::<C>(),
            value_align: align_of::<C>(),
        }
    }

    /// Returns `true` if the described pool stores values of type `C`.
    #[inline]
    pub fn stores<C: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<C>()
    }
}

impl fmt::Display for ComponentDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pool {}: {} ({} bytes, align {})",
            self.component_id, self.name, self.value_size, self.value_align
        )
    }
}

/// A tuple of component types usable in multi-component operations.
///
/// Implemented for tuples of arity one through eight. All methods work
/// element by element in tuple order.
pub trait ComponentSet<E: EntityKind> {
    /// Returns `true` iff the entity holds every component in the set.
    fn contains_all(registry: &Registry<E>, entity: E) -> bool;

    /// Returns `true` iff the entity holds at least one component in the set.
    fn contains_any(registry: &Registry<E>, entity: E) -> bool;

    /// Adds each component in the set with its default value.
    ///
    /// Stops at the first failure; earlier additions remain applied.
    fn add_defaults(registry: &mut Registry<E>, entity: E) -> RegistryResult<()>;

    /// Removes each component in the set.
    ///
    /// Stops at the first failure; earlier removals remain applied.
    fn remove_from(registry: &mut Registry<E>, entity: E) -> RegistryResult<()>;
}

macro_rules! component_set {
    ($($ty:ident),+) => {
        impl<E: EntityKind, $($ty: Component),+> ComponentSet<E> for ($($ty,)+) {
            fn contains_all(registry: &Registry<E>, entity: E) -> bool {
                $(registry.contains::<$ty>(entity))&&+
            }

            fn contains_any(registry: &Registry<E>, entity: E) -> bool {
                $(registry.contains::<$ty>(entity))||+
            }

            fn add_defaults(registry: &mut Registry<E>, entity: E) -> RegistryResult<()> {
                $(registry.add_default::<$ty>(entity)?;)+
                Ok(())
            }

            fn remove_from(registry: &mut Registry<E>, entity: E) -> RegistryResult<()> {
                $(registry.remove::<$ty>(entity)?;)+
                Ok(())
            }
        }
    };
}

component_set!(A);
component_set!(A, B);
component_set!(A, B, C);
component_set!(A, B, C, D);
component_set!(A, B, C, D, F);
component_set!(A, B, C, D, F, G);
component_set!(A, B, C, D, F, G, H);
component_set!(A, B, C, D, F, G, H, I);
