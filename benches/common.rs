#![allow(dead_code)]

use entity_registry::{Entity, Registry, RegistryResult};

pub const ENTITIES_SMALL: usize = 100_000;
pub const ENTITIES_MED: usize = 1_000_000;

#[derive(Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Default, PartialEq)]
pub struct Wealth {
    pub value: f32,
}

pub fn make_registry() -> Registry {
    Registry::new()
}

pub fn populate(registry: &mut Registry, count: usize) -> RegistryResult<Vec<Entity>> {
    let entities = registry.create_many(count)?;
    for &entity in &entities {
        registry.add(entity, Position { x: 0.0, y: 0.0 })?;
        registry.add(entity, Wealth { value: 100.0 })?;
    }
    Ok(entities)
}

/// xorshift64* generator used to pick churn victims.
pub struct XorShift(u64);

impl XorShift {
    pub fn new() -> Self {
        Self(0x9E37_79B9_7F4A_7C15)
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    #[inline]
    pub fn next_index(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

impl Default for XorShift {
    fn default() -> Self {
        Self::new()
    }
}
