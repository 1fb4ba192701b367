//! Merkle accumulators of a shielded pool
//!
//! This crate computes the roots and membership proofs that off-chain tooling and
//! on-chain verifiers must agree on bit for bit:
//! - [`SparseMerkleTree`]: fixed depth binary tree, only the populated prefix is stored
//! - [`TaxiTree`]: two depth 7 halves, each built from leaves or given as a root
//! - [`BusTree`]: UTXO pack, branch and root tiers threaded through a [`BusLedger`]
//! - [`ForestTree`]: the taxi, bus, ferry and static roots under one root
//! - [`TreeOfTrees`]: equally deep subtrees behind one logical tree
//!
//! Every tree is generic over the [`Hasher`] combining field elements, so the
//! protocol Poseidon can be swapped for another hash in tests.

pub mod config;
mod error;
pub mod field;
mod hasher;
mod proof;
mod tree;

pub use error::{BusTier, TreeError};
pub use field::{FieldElement, TAXI_ZERO_LEAF};
pub use hasher::Hasher;
#[cfg(feature = "poseidon")]
pub use hasher::Poseidon;
pub use proof::{CompressedProof, Proof};
pub use tree::{
    walk_up, BusLedger, BusTree, EmptyTree, ForestLeaf, ForestTree, MerkleRoot, SparseMerkleTree,
    Subtree, TaxiHalf, TaxiTree, TreeOfTrees, MAX_DEPTH,
};

#[cfg(test)]
mod tests;
