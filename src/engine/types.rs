//! Core Identifier Types and Bit-Level Layouts
//!
//! This module defines the **identifier algebra** shared by every other part
//! of the registry: the packing of an entity identifier into an *id* subfield
//! and a *generation* subfield, the reserved null identifier, and the five
//! canonical layout presets.
//!
//! ## Entity Representation
//!
//! An entity is a single unsigned integer of width `W` bits with the layout:
//!
//! ```text
//! | generation | id |
//! ```
//!
//! - **Id** (the lower `S` bits) indexes into the entity table and into the
//!   sparse arrays of component pools.
//! - **Generation** (the upper `W − S` bits) increments every time the id is
//!   recycled, so stale handles to a destroyed entity can be detected.
//!
//! The all-ones id value is reserved as the **null** identifier. It never
//! names a live entity and doubles as the free-list terminator inside the
//! entity table.
//!
//! ## Monomorphisation
//!
//! Layouts are selected by implementing [`EntityKind`], whose associated
//! constants fix `W` and `S` at compile time. All algebra runs in a widened
//! `u64` domain, so the generic code paths compile down to constant masks
//! and shifts for each concrete layout. Runtime-polymorphic widths are
//! deliberately unsupported.
//!
//! The exact bit widths of the presets are validated with static assertions.

use std::fmt;
use std::hash::Hash;

/// Identifier for a component pool within one registry.
pub type ComponentID = u16;

const fn mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

/// Compile-time layout of a packed entity identifier.
///
/// ## Purpose
/// `EntityKind` fixes the total width `W` ([`ENTITY_BITS`]) and the split
/// point `S` ([`ID_BITS`]) of an identifier type, and derives the masks used
/// by the id/generation algebra. A registry is generic over an `EntityKind`,
/// so every masking operation in its hot paths is a compile-time constant.
///
/// ## Invariants
/// Implementations must uphold `1 <= ID_BITS <= ENTITY_BITS - 1` and back
/// the identifier with an unsigned integer of exactly `ENTITY_BITS` bits.
/// The presets generated in this module assert both at compile time.
///
/// ## Notes
/// The algebra is total: every method accepts any bit pattern, including the
/// null identifier. Validity of an identifier against a live entity table is
/// the registry's concern, not this trait's.
///
/// [`ENTITY_BITS`]: EntityKind::ENTITY_BITS
/// [`ID_BITS`]: EntityKind::ID_BITS
pub trait EntityKind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Total width `W` of the identifier in bits.
    const ENTITY_BITS: u32;

    /// Width `S` of the id subfield in bits.
    const ID_BITS: u32;

    /// Width of the generation subfield, `W - S`.
    const GENERATION_BITS: u32 = Self::ENTITY_BITS - Self::ID_BITS;

    /// Mask selecting the id subfield.
    const ID_MASK: u64 = mask(Self::ID_BITS);

    /// Mask selecting the generation subfield after shifting.
    const GENERATION_MASK: u64 = mask(Self::ENTITY_BITS - Self::ID_BITS);

    /// The reserved null id, `2^S - 1`. Also the free-list terminator and
    /// the upper bound on live entities.
    const NULL_ID: u64 = mask(Self::ID_BITS);

    /// Reconstructs an identifier from its widened bit pattern.
    fn from_bits(bits: u64) -> Self;

    /// Returns the identifier's bit pattern widened to `u64`.
    fn bits(self) -> u64;

    /// Returns the id subfield.
    #[inline]
    fn id(self) -> u64 {
        self.bits() & Self::ID_MASK
    }

    /// Returns the generation subfield.
    #[inline]
    fn generation(self) -> u64 {
        (self.bits() >> Self::ID_BITS) & Self::GENERATION_MASK
    }

    /// Packs an id and a generation into an identifier.
    ///
    /// Out-of-range inputs are truncated to their subfield widths.
    #[inline]
    fn compose(id: u64, generation: u64) -> Self {
        Self::from_bits((id & Self::ID_MASK) | ((generation & Self::GENERATION_MASK) << Self::ID_BITS))
    }

    /// Returns the null identifier: the reserved id with generation zero.
    #[inline]
    fn null() -> Self {
        Self::compose(Self::NULL_ID, 0)
    }

    /// Returns `true` if this identifier carries the reserved null id.
    #[inline]
    fn is_null(self) -> bool {
        self.id() == Self::NULL_ID
    }

    /// Returns the generation that follows `generation`, wrapping to zero
    /// past the maximum of the subfield.
    #[inline]
    fn next_generation(generation: u64) -> u64 {
        generation.wrapping_add(1) & Self::GENERATION_MASK
    }
}

macro_rules! entity_kind {
    ($(#[$meta:meta])* $name:ident, $repr:ty, $bits:expr, $id_bits:expr) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name($repr);

        impl EntityKind for $name {
            const ENTITY_BITS: u32 = $bits;
            const ID_BITS: u32 = $id_bits;

            #[inline]
            fn from_bits(bits: u64) -> Self {
                Self(bits as $repr)
            }

            #[inline]
            fn bits(self) -> u64 {
                self.0 as u64
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_null() {
                    write!(f, concat!(stringify!($name), "(null)"))
                } else {
                    write!(
                        f,
                        concat!(stringify!($name), "({}v{})"),
                        self.id(),
                        self.generation()
                    )
                }
            }
        }

        const _: [(); 1] = [(); (($id_bits as u32) >= 1) as usize];
        const _: [(); 1] = [(); (($id_bits as u32) < ($bits as u32)) as usize];
        const _: [(); 1] = [(); (<$repr>::BITS == ($bits as u32)) as usize];
    };
}

entity_kind!(
    /// 8-bit identifier with a 4-bit id: at most 15 live entities and a
    /// 16-value generation cycle. Intended for tests and tiny simulations.
    TinyEntity, u8, 8, 4
);

entity_kind!(
    /// 16-bit identifier with an 8-bit id: at most 255 live entities.
    SmallEntity, u16, 16, 8
);

entity_kind!(
    /// 32-bit identifier split evenly: 16-bit id, 16-bit generation.
    MediumEntity, u32, 32, 16
);

entity_kind!(
    /// The default layout: 32-bit identifier with a 20-bit id, giving
    /// roughly one million live entities and a 4096-value generation cycle.
    Entity, u32, 32, 20
);

entity_kind!(
    /// 64-bit identifier split evenly: 32-bit id, 32-bit generation.
    LargeEntity, u64, 64, 32
);
