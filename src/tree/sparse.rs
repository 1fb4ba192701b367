//! Fixed depth sparse merkle tree
//!
//! Leaves are stored densely from index 0. Every position past the stored prefix
//! implicitly holds `zero_value` and every missing node is the default hash of
//! its level, so only the populated prefix of each layer is materialized.

use std::marker::PhantomData;

use tracing::{trace, warn};

use crate::{walk_up, EmptyTree, FieldElement, Hasher, MerkleRoot, Proof, TreeError};

/// Deepest supported tree, `2^depth` leaves must be addressable.
pub const MAX_DEPTH: usize = 32;

/// Sparse merkle tree over field elements.
/// * `H` - Hasher that will be used to hash nodes.
#[derive(Debug, Clone)]
pub struct SparseMerkleTree<H: Hasher> {
    depth: usize,
    zero_value: FieldElement,
    /// `default_hashes[i]` is the root of an empty subtree of depth `i`
    default_hashes: Vec<FieldElement>,
    /// `layers[0]` holds the leaves, `layers[depth]` at most the root
    layers: Vec<Vec<FieldElement>>,
    _phantom: PhantomData<H>,
}

impl<H: Hasher> SparseMerkleTree<H> {
    /// Builds a tree of the given depth from its first leaves.
    pub fn new(
        leaves: Vec<FieldElement>,
        depth: usize,
        zero_value: FieldElement,
    ) -> Result<Self, TreeError> {
        if depth > MAX_DEPTH {
            return Err(TreeError::InvalidDepth {
                depth,
                max: MAX_DEPTH,
            });
        }
        let capacity = 1usize << depth;
        if leaves.len() > capacity {
            return Err(TreeError::TreeFull { capacity });
        }
        let default_hashes = EmptyTree::<H>::build(zero_value, depth)?;
        let layers = Self::build_layers(leaves, &default_hashes)?;
        Ok(Self {
            depth,
            zero_value,
            default_hashes,
            layers,
            _phantom: PhantomData,
        })
    }

    /// Builds a tree whose leaves are the arity 1 hashes of `raw_leaves`.
    pub fn with_hashed_leaves(
        raw_leaves: Vec<FieldElement>,
        depth: usize,
        zero_value: FieldElement,
    ) -> Result<Self, TreeError> {
        let leaves = raw_leaves
            .into_iter()
            .map(|leaf| H::hash(&[leaf]))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(leaves, depth, zero_value)
    }

    /// Tree without any stored leaf.
    pub fn empty(depth: usize, zero_value: FieldElement) -> Result<Self, TreeError> {
        Self::new(Vec::new(), depth, zero_value)
    }

    /// Hashes every layer above `leaves`, padding odd nodes with the default hash of
    /// their level.
    fn build_layers(
        leaves: Vec<FieldElement>,
        default_hashes: &[FieldElement],
    ) -> Result<Vec<Vec<FieldElement>>, TreeError> {
        let depth = default_hashes.len() - 1;
        trace!(depth, leaves = leaves.len(), "building sparse merkle tree layers");
        let mut layers = Vec::with_capacity(depth + 1);
        layers.push(leaves);
        for level in 0..depth {
            let parents = layers[level]
                .chunks(2)
                .map(|pair| {
                    let right = pair.get(1).copied().unwrap_or(default_hashes[level]);
                    H::hash(&[pair[0], right])
                })
                .collect::<Result<Vec<_>, _>>()?;
            layers.push(parents);
        }
        Ok(layers)
    }

    /// Recomputes every layer from `leaves`. The tree is left untouched on error.
    fn rebuild(&mut self, leaves: Vec<FieldElement>) -> Result<(), TreeError> {
        self.layers = Self::build_layers(leaves, &self.default_hashes)?;
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn zero_value(&self) -> FieldElement {
        self.zero_value
    }

    /// Number of addressable leaves, `2^depth`.
    pub fn leaf_count(&self) -> usize {
        1 << self.depth
    }

    /// Number of stored leaves.
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    pub fn leaves(&self) -> &[FieldElement] {
        &self.layers[0]
    }

    /// Roots of empty subtrees, indexed by level.
    pub fn default_hashes(&self) -> &[FieldElement] {
        &self.default_hashes
    }

    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.leaf_count()
    }

    fn check_addressable(&self, index: usize) -> Result<(), TreeError> {
        if index >= self.leaf_count() {
            return Err(TreeError::InvalidIndex {
                index,
                bound: self.leaf_count(),
            });
        }
        Ok(())
    }

    fn check_stored(&self, index: usize) -> Result<(), TreeError> {
        if index >= self.len() {
            return Err(TreeError::InvalidIndex {
                index,
                bound: self.len(),
            });
        }
        Ok(())
    }

    fn prepare(value: FieldElement, hash_first: bool) -> Result<FieldElement, TreeError> {
        if hash_first {
            H::hash(&[value])
        } else {
            Ok(value)
        }
    }

    /// Leaf at `index`, `zero_value` past the stored leaves.
    pub fn leaf(&self, index: usize) -> Result<FieldElement, TreeError> {
        self.check_addressable(index)?;
        Ok(self.layers[0].get(index).copied().unwrap_or(self.zero_value))
    }

    /// Appends a leaf, hashing it first if asked, and returns its index.
    pub fn add_leaf(&mut self, value: FieldElement, hash_first: bool) -> Result<usize, TreeError> {
        if self.is_full() {
            return Err(TreeError::TreeFull {
                capacity: self.leaf_count(),
            });
        }
        let leaf = Self::prepare(value, hash_first)?;
        let mut leaves = self.layers[0].clone();
        leaves.push(leaf);
        self.rebuild(leaves)?;
        Ok(self.len() - 1)
    }

    /// Replaces a stored leaf. Implicit zero leaves cannot be updated.
    pub fn update_leaf(
        &mut self,
        index: usize,
        value: FieldElement,
        hash_first: bool,
    ) -> Result<(), TreeError> {
        self.check_stored(index)?;
        let leaf = Self::prepare(value, hash_first)?;
        let mut leaves = self.layers[0].clone();
        leaves[index] = leaf;
        self.rebuild(leaves)
    }

    /// Removes a stored leaf and returns it.
    ///
    /// Leaves after `index` move one position down, so proofs and indices issued
    /// for them before the removal no longer hold.
    pub fn remove_leaf(&mut self, index: usize) -> Result<FieldElement, TreeError> {
        self.check_stored(index)?;
        let shifted = self.len() - index - 1;
        if shifted > 0 {
            warn!(index, shifted, "removing a non tail leaf shifts later leaf indices");
        }
        let mut leaves = self.layers[0].clone();
        let removed = leaves.remove(index);
        self.rebuild(leaves)?;
        Ok(removed)
    }

    /// Root of the tree, the default root when no leaf is stored.
    pub fn root(&self) -> FieldElement {
        self.layers[self.depth]
            .first()
            .copied()
            .unwrap_or(self.default_hashes[self.depth])
    }

    /// Root of the empty tree of this depth and zero value.
    pub fn default_root(&self) -> FieldElement {
        self.default_hashes[self.depth]
    }

    /// Siblings of the path from leaf `index` to the root.
    pub fn merkle_proof(&self, index: usize) -> Result<Proof, TreeError> {
        self.check_addressable(index)?;
        let mut siblings = Vec::with_capacity(self.depth);
        let mut position = index;
        for level in 0..self.depth {
            let sibling = self.layers[level]
                .get(position ^ 1)
                .copied()
                .unwrap_or(self.default_hashes[level]);
            siblings.push(sibling);
            position >>= 1;
        }
        Ok(Proof::new(siblings))
    }

    /// Checks that `proof` leads from `leaf` at `index` to the root of this tree.
    pub fn verify_merkle_proof(
        &self,
        leaf: FieldElement,
        index: usize,
        proof: &Proof,
    ) -> Result<bool, TreeError> {
        self.check_addressable(index)?;
        if proof.len() != self.depth {
            return Ok(false);
        }
        Ok(walk_up::<H>(leaf, index, proof.siblings())? == self.root())
    }
}

impl<H: Hasher> MerkleRoot for SparseMerkleTree<H> {
    fn merkle_root(&self) -> FieldElement {
        self.root()
    }
}
