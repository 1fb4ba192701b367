//! Taxi tree: two depth 7 halves under one combining level.

use tracing::debug;

use crate::{
    config::{TAXI_SUBTREE_DEPTH, TAXI_TREE_DEPTH},
    field::field_to_hex,
    walk_up, EmptyTree, FieldElement, Hasher, MerkleRoot, Proof, SparseMerkleTree, Subtree,
    TreeError, TAXI_ZERO_LEAF,
};

/// Leaves of one half of a taxi tree.
const HALF_LEAF_COUNT: usize = 1 << TAXI_SUBTREE_DEPTH;
const LEAF_COUNT: usize = 1 << TAXI_TREE_DEPTH;

/// Input for one half of a taxi tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxiHalf {
    /// Leaves of a depth 7 subtree.
    Leaves(Vec<FieldElement>),
    /// Root of a depth 7 subtree computed elsewhere.
    Root(FieldElement),
}

/// Depth 8 tree made of a left and a right depth 7 subtree.
#[derive(Debug, Clone)]
pub struct TaxiTree<H: Hasher> {
    halves: [Subtree<H>; 2],
    zero_value: FieldElement,
    /// depth 1 tree over the two half roots
    combined: SparseMerkleTree<H>,
}

impl<H: Hasher> TaxiTree<H> {
    /// Builds a taxi tree padded with [`TAXI_ZERO_LEAF`].
    pub fn new(left: TaxiHalf, right: TaxiHalf) -> Result<Self, TreeError> {
        Self::with_zero_value(left, right, TAXI_ZERO_LEAF)
    }

    pub fn with_zero_value(
        left: TaxiHalf,
        right: TaxiHalf,
        zero_value: FieldElement,
    ) -> Result<Self, TreeError> {
        let left = Self::build_half(left, zero_value)?;
        let right = Self::build_half(right, zero_value)?;
        let empty_half_root = EmptyTree::<H>::root(zero_value, TAXI_SUBTREE_DEPTH)?;
        let combined = SparseMerkleTree::new(vec![left.root(), right.root()], 1, empty_half_root)?;
        debug!(
            left_abstracted = left.is_abstracted(),
            right_abstracted = right.is_abstracted(),
            root = %field_to_hex(&combined.root()),
            "built taxi tree"
        );
        Ok(Self {
            halves: [left, right],
            zero_value,
            combined,
        })
    }

    fn build_half(half: TaxiHalf, zero_value: FieldElement) -> Result<Subtree<H>, TreeError> {
        Ok(match half {
            TaxiHalf::Leaves(leaves) => Subtree::Materialized(SparseMerkleTree::new(
                leaves,
                TAXI_SUBTREE_DEPTH,
                zero_value,
            )?),
            TaxiHalf::Root(root) => Subtree::Abstracted(root),
        })
    }

    pub fn left(&self) -> &Subtree<H> {
        &self.halves[0]
    }

    pub fn right(&self) -> &Subtree<H> {
        &self.halves[1]
    }

    pub fn root(&self) -> FieldElement {
        self.combined.root()
    }

    /// Roots of empty subtrees at each of the 9 levels of the tree.
    pub fn default_hashes(&self) -> Result<Vec<FieldElement>, TreeError> {
        EmptyTree::<H>::build(self.zero_value, TAXI_TREE_DEPTH)
    }

    /// Half owning `leaf_index` and the position inside it.
    fn locate(&self, leaf_index: usize) -> Result<(usize, &SparseMerkleTree<H>), TreeError> {
        if leaf_index >= LEAF_COUNT {
            return Err(TreeError::LeafIndexOutOfBound {
                index: leaf_index,
                bound: LEAF_COUNT,
            });
        }
        let half = leaf_index / HALF_LEAF_COUNT;
        let tree = self.halves[half]
            .as_tree()
            .ok_or(TreeError::AbstractedSubtreeProof { half })?;
        Ok((half, tree))
    }

    pub fn leaf(&self, leaf_index: usize) -> Result<FieldElement, TreeError> {
        let (_, tree) = self.locate(leaf_index)?;
        tree.leaf(leaf_index % HALF_LEAF_COUNT)
    }

    /// Proof of `leaf_index`: 7 siblings inside its half then the other half root.
    pub fn merkle_proof(&self, leaf_index: usize) -> Result<Proof, TreeError> {
        let (half, tree) = self.locate(leaf_index)?;
        let proof = tree.merkle_proof(leaf_index % HALF_LEAF_COUNT)?;
        Ok(proof.concat(self.combined.merkle_proof(half)?))
    }

    /// Checks the path from `leaf` to the root. Needs no leaves, so it also holds
    /// for leaves of an abstracted half.
    pub fn verify_merkle_proof(
        &self,
        leaf: FieldElement,
        leaf_index: usize,
        proof: &Proof,
    ) -> Result<bool, TreeError> {
        if leaf_index >= LEAF_COUNT {
            return Err(TreeError::LeafIndexOutOfBound {
                index: leaf_index,
                bound: LEAF_COUNT,
            });
        }
        if proof.len() != TAXI_TREE_DEPTH {
            return Ok(false);
        }
        Ok(walk_up::<H>(leaf, leaf_index, proof.siblings())? == self.root())
    }
}

impl<H: Hasher> MerkleRoot for TaxiTree<H> {
    fn merkle_root(&self) -> FieldElement {
        self.root()
    }
}
