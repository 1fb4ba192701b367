//! Example of implementing a custom hasher for the trees
//!
//! This example demonstrates:
//! - Creating a custom hasher implementation
//! - Using it with the tree
//! - Comparing roots across hashers

use ark_ff::PrimeField;
use merkle_forest::{
    field::{field_to_bytes, field_to_hex},
    FieldElement, Hasher, SparseMerkleTree, TreeError,
};
use sha2::{Digest, Sha256};

// Custom hasher that uses SHA256 but adds a domain prefix to the input
#[derive(Debug, Clone)]
struct PrefixedSha256;

impl Hasher for PrefixedSha256 {
    fn hash(inputs: &[FieldElement]) -> Result<FieldElement, TreeError> {
        let mut hasher = Sha256::new();
        // Add a custom prefix to the input
        hasher.update(b"custom_prefix:");
        for input in inputs {
            hasher.update(field_to_bytes(input));
        }
        Ok(FieldElement::from_be_bytes_mod_order(&hasher.finalize()))
    }
}

fn main() -> Result<(), TreeError> {
    let leaves: Vec<_> = (1..=4u64).map(FieldElement::from).collect();

    // Create a new tree with our custom hasher
    let tree =
        SparseMerkleTree::<PrefixedSha256>::new(leaves.clone(), 2, FieldElement::from(0u64))?;
    println!("Root with custom hasher: {}", field_to_hex(&tree.root()));

    // Compare with standard SHA256
    let standard_tree = SparseMerkleTree::<Sha256>::new(leaves, 2, FieldElement::from(0u64))?;
    println!("Root with standard SHA256: {}", field_to_hex(&standard_tree.root()));

    // Note that the roots are different due to our custom prefix
    println!("\nThe roots are different because our custom hasher adds a prefix to the input.");
    Ok(())
}
