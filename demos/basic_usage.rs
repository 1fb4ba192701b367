//! Basic example of using the sparse merkle tree
//!
//! This example demonstrates:
//! - Creating a new tree
//! - Appending leaves
//! - Getting the root
//! - Verifying merkle proofs

use merkle_forest::{field::field_to_hex, FieldElement, Poseidon, SparseMerkleTree, TAXI_ZERO_LEAF};

fn main() -> Result<(), merkle_forest::TreeError> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    // Create a depth 16 tree padded with the protocol zero leaf, hashing with Poseidon
    let mut tree = SparseMerkleTree::<Poseidon>::empty(16, TAXI_ZERO_LEAF)?;

    // Append some commitments
    for commitment in [11u64, 22, 33] {
        let index = tree.add_leaf(FieldElement::from(commitment), false)?;
        println!("Inserted {} at index {}", commitment, index);
    }

    // Get the root
    println!("Root: {}", field_to_hex(&tree.root()));

    // Get and verify a merkle proof for the second leaf
    let proof = tree.merkle_proof(1)?;
    println!("Merkle proof length: {}", proof.len());
    let valid = tree.verify_merkle_proof(FieldElement::from(22u64), 1, &proof)?;
    println!("Proof verification: {}", valid);

    // Most siblings are empty subtrees, the compressed proof only keeps two of them
    let compressed = proof.compress(tree.default_hashes());
    println!(
        "Compressed proof: {} siblings, {} bytes encoded",
        compressed.siblings().len(),
        compressed.encode().len()
    );
    Ok(())
}
