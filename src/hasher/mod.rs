#[cfg(feature = "poseidon")]
mod poseidon;

use ark_ff::PrimeField;
use sha2::{Digest, Sha256};

#[cfg(feature = "poseidon")]
pub use poseidon::Poseidon;

use crate::{field::field_to_bytes, FieldElement, TreeError};

/// Hash primitive shared by every tree in this crate.
///
/// Implementations must be deterministic and order sensitive: `hash(&[a, b])` and
/// `hash(&[b, a])` encode a left and a right position. Trees call it with one input
/// to hash a raw leaf and with two inputs to combine children.
///
/// Hashers are zero sized markers carried by the trees, `Clone` lets a tree be
/// cloned whatever hasher it is built with.
pub trait Hasher: Clone {
    fn hash(inputs: &[FieldElement]) -> Result<FieldElement, TreeError>;
}

/// SHA-256 over the big-endian inputs, reduced into the field.
impl Hasher for Sha256 {
    fn hash(inputs: &[FieldElement]) -> Result<FieldElement, TreeError> {
        if inputs.is_empty() {
            return Err(TreeError::UnsupportedArity(0));
        }
        let mut hasher = Sha256::new();
        for input in inputs {
            hasher.update(field_to_bytes(input));
        }
        Ok(FieldElement::from_be_bytes_mod_order(&hasher.finalize()))
    }
}
