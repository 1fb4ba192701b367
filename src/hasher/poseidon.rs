//! Circom compatible Poseidon, the hash the protocol verifiers and circuits use.

use std::{
    cell::RefCell,
    collections::{hash_map::Entry, HashMap},
};

use ark_bn254::Fr;
use light_poseidon::{Poseidon as CircomPoseidon, PoseidonHasher};

use super::Hasher;
use crate::{FieldElement, TreeError};

/// Largest arity with circom parameters.
const MAX_ARITY: usize = 12;

thread_local! {
    static INSTANCES: RefCell<HashMap<usize, CircomPoseidon<Fr>>> = RefCell::new(HashMap::new());
}

/// Poseidon over BN254 with the circom round constants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Poseidon;

impl Hasher for Poseidon {
    fn hash(inputs: &[FieldElement]) -> Result<FieldElement, TreeError> {
        let arity = inputs.len();
        if arity == 0 || arity > MAX_ARITY {
            return Err(TreeError::UnsupportedArity(arity));
        }
        INSTANCES.with(|instances| {
            let mut instances = instances.borrow_mut();
            let poseidon = match instances.entry(arity) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(
                    CircomPoseidon::<Fr>::new_circom(arity)
                        .map_err(|e| TreeError::Hasher(e.to_string()))?,
                ),
            };
            poseidon
                .hash(inputs)
                .map_err(|e| TreeError::Hasher(e.to_string()))
        })
    }
}
