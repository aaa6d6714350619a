//! Model-based property tests: random operation sequences are replayed
//! against a naive reference model, and the registry's observable state must
//! agree with the model after every step.

use std::collections::HashMap;

use proptest::prelude::*;

use entity_registry::{Entity, EntityKind, Registry, RegistryError};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Mass(u32);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Charge(u32);

#[derive(Clone, Debug)]
enum Op {
    Create,
    Discard(usize),
    AddMass(usize, u32),
    RemoveMass(usize),
    ModifyMass(usize, u32),
    AddCharge(usize, u32),
    RemoveCharge(usize),
    RemoveAll(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        2 => any::<usize>().prop_map(Op::Discard),
        2 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::AddMass(i, v)),
        1 => any::<usize>().prop_map(Op::RemoveMass),
        1 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::ModifyMass(i, v)),
        1 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::AddCharge(i, v)),
        1 => any::<usize>().prop_map(Op::RemoveCharge),
        1 => any::<usize>().prop_map(Op::RemoveAll),
    ]
}

/// Naive reference model: a map of live handles keyed by id, plus one value
/// map per component type.
#[derive(Default)]
struct Model {
    live: HashMap<u64, Entity>,
    mass: HashMap<u64, u32>,
    charge: HashMap<u64, u32>,
    mass_pool_exists: bool,
    charge_pool_exists: bool,
}

impl Model {
    fn is_valid(&self, handle: Entity) -> bool {
        self.live.get(&handle.id()) == Some(&handle)
    }
}

fn pick(handles: &[Entity], raw: usize) -> Option<Entity> {
    if handles.is_empty() {
        None
    } else {
        Some(handles[raw % handles.len()])
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn random_operation_sequences_preserve_invariants(
        ops in prop::collection::vec(op_strategy(), 1..250)
    ) {
        let mut registry: Registry = Registry::new();
        let mut model = Model::default();
        let mut handles: Vec<Entity> = Vec::new();

        for op in ops {
            match op {
                Op::Create => {
                    let entity = registry.create().unwrap();
                    prop_assert!(registry.is_valid(entity));
                    prop_assert!(!registry.contains::<Mass>(entity));
                    prop_assert!(!registry.contains::<Charge>(entity));
                    model.live.insert(entity.id(), entity);
                    handles.push(entity);
                }
                Op::Discard(raw) => {
                    if let Some(handle) = pick(&handles, raw) {
                        let valid = model.is_valid(handle);
                        let result = registry.discard(handle);
                        prop_assert_eq!(result.is_ok(), valid);
                        if valid {
                            model.live.remove(&handle.id());
                            model.mass.remove(&handle.id());
                            model.charge.remove(&handle.id());
                            prop_assert!(!registry.is_valid(handle));
                            prop_assert!(!registry.contains::<Mass>(handle));
                            prop_assert!(!registry.contains::<Charge>(handle));
                        }
                    }
                }
                Op::AddMass(raw, value) => {
                    if let Some(handle) = pick(&handles, raw) {
                        let result = registry.add(handle, Mass(value));
                        if !model.is_valid(handle) {
                            prop_assert_eq!(result, Err(RegistryError::InvalidEntity));
                        } else if model.mass.contains_key(&handle.id()) {
                            prop_assert!(matches!(result, Err(RegistryError::EntityInPool { .. })), "expected EntityInPool");
                        } else {
                            prop_assert!(result.is_ok());
                            model.mass.insert(handle.id(), value);
                            model.mass_pool_exists = true;
                        }
                    }
                }
                Op::RemoveMass(raw) => {
                    if let Some(handle) = pick(&handles, raw) {
                        let result = registry.remove::<Mass>(handle);
                        if !model.is_valid(handle) {
                            prop_assert_eq!(result, Err(RegistryError::InvalidEntity));
                        } else if !model.mass_pool_exists {
                            prop_assert!(matches!(
                                result,
                                Err(RegistryError::PoolDoesNotExist { .. })
                            ), "expected PoolDoesNotExist");
                        } else if !model.mass.contains_key(&handle.id()) {
                            prop_assert!(matches!(
                                result,
                                Err(RegistryError::EntityNotInPool { .. })
                            ), "expected EntityNotInPool");
                        } else {
                            prop_assert!(result.is_ok());
                            model.mass.remove(&handle.id());
                        }
                    }
                }
                Op::ModifyMass(raw, value) => {
                    if let Some(handle) = pick(&handles, raw) {
                        let result = registry.modify(handle, Mass(value));
                        if !model.is_valid(handle) {
                            prop_assert_eq!(result, Err(RegistryError::InvalidEntity));
                        } else if !model.mass_pool_exists {
                            prop_assert!(matches!(
                                result,
                                Err(RegistryError::PoolDoesNotExist { .. })
                            ), "expected PoolDoesNotExist");
                        } else if !model.mass.contains_key(&handle.id()) {
                            prop_assert!(matches!(
                                result,
                                Err(RegistryError::EntityNotInPool { .. })
                            ), "expected EntityNotInPool");
                        } else {
                            prop_assert!(result.is_ok());
                            model.mass.insert(handle.id(), value);
                        }
                    }
                }
                Op::AddCharge(raw, value) => {
                    if let Some(handle) = pick(&handles, raw) {
                        let result = registry.add(handle, Charge(value));
                        if !model.is_valid(handle) {
                            prop_assert_eq!(result, Err(RegistryError::InvalidEntity));
                        } else if model.charge.contains_key(&handle.id()) {
                            prop_assert!(matches!(result, Err(RegistryError::EntityInPool { .. })), "expected EntityInPool");
                        } else {
                            prop_assert!(result.is_ok());
                            model.charge.insert(handle.id(), value);
                            model.charge_pool_exists = true;
                        }
                    }
                }
                Op::RemoveCharge(raw) => {
                    if let Some(handle) = pick(&handles, raw) {
                        let result = registry.remove::<Charge>(handle);
                        if !model.is_valid(handle) {
                            prop_assert_eq!(result, Err(RegistryError::InvalidEntity));
                        } else if !model.charge_pool_exists {
                            prop_assert!(matches!(
                                result,
                                Err(RegistryError::PoolDoesNotExist { .. })
                            ), "expected PoolDoesNotExist");
                        } else if !model.charge.contains_key(&handle.id()) {
                            prop_assert!(matches!(
                                result,
                                Err(RegistryError::EntityNotInPool { .. })
                            ), "expected EntityNotInPool");
                        } else {
                            prop_assert!(result.is_ok());
                            model.charge.remove(&handle.id());
                        }
                    }
                }
                Op::RemoveAll(raw) => {
                    if let Some(handle) = pick(&handles, raw) {
                        let valid = model.is_valid(handle);
                        let result = registry.remove_all(handle);
                        prop_assert_eq!(result.is_ok(), valid);
                        if valid {
                            model.mass.remove(&handle.id());
                            model.charge.remove(&handle.id());
                            prop_assert!(registry.is_valid(handle));
                        }
                    }
                }
            }

            // Pool bookkeeping must agree with the model after every step.
            prop_assert_eq!(registry.pool_len::<Mass>(), model.mass.len());
            prop_assert_eq!(registry.pool_len::<Charge>(), model.charge.len());
        }

        // Final audit across every handle ever issued.
        prop_assert_eq!(registry.alive_count(), model.live.len());
        for &handle in &handles {
            let valid = model.is_valid(handle);
            prop_assert_eq!(registry.is_valid(handle), valid);
            prop_assert!(registry.has_spawned(handle));
            prop_assert_eq!(
                registry.contains::<Mass>(handle),
                valid && model.mass.contains_key(&handle.id())
            );
            prop_assert_eq!(
                registry.contains::<Charge>(handle),
                valid && model.charge.contains_key(&handle.id())
            );
            if valid {
                prop_assert_eq!(
                    registry.current_generation_of(handle).unwrap(),
                    handle.generation()
                );
                if let Some(&value) = model.mass.get(&handle.id()) {
                    prop_assert_eq!(registry.get::<Mass>(handle).unwrap(), &Mass(value));
                }
                if let Some(&value) = model.charge.get(&handle.id()) {
                    prop_assert_eq!(registry.get::<Charge>(handle).unwrap(), &Charge(value));
                }
            }
        }
    }
}
