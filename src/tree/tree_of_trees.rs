//! One large tree made of `2^depth` subtrees under a combining tree.
//!
//! Slots without a subtree are stood in for by a shared empty tree, only the
//! subtrees holding leaves are materialized.

use tracing::debug;

use crate::{FieldElement, Hasher, MerkleRoot, Proof, SparseMerkleTree, TreeError, MAX_DEPTH};

#[derive(Debug, Clone)]
pub struct TreeOfTrees<H: Hasher> {
    subtrees: Vec<SparseMerkleTree<H>>,
    depth: usize,
    /// empty subtree standing in for every missing slot
    zero_tree: SparseMerkleTree<H>,
    /// tree over the subtree roots
    combined: SparseMerkleTree<H>,
}

impl<H: Hasher> TreeOfTrees<H> {
    /// Combines `subtrees`, all of depth `subtree_depth`, under a tree of depth `depth`.
    pub fn new(
        subtrees: Vec<SparseMerkleTree<H>>,
        depth: usize,
        subtree_depth: usize,
        zero_value: FieldElement,
    ) -> Result<Self, TreeError> {
        let total_depth = depth.saturating_add(subtree_depth);
        if total_depth > MAX_DEPTH {
            return Err(TreeError::InvalidDepth {
                depth: total_depth,
                max: MAX_DEPTH,
            });
        }
        let capacity = 1usize << depth;
        if subtrees.len() > capacity {
            return Err(TreeError::TooManySubtrees {
                count: subtrees.len(),
                capacity,
            });
        }
        if let Some(subtree) = subtrees.iter().find(|t| t.depth() != subtree_depth) {
            return Err(TreeError::SubtreeDepthMismatch {
                expected: subtree_depth,
                actual: subtree.depth(),
            });
        }
        if let Some(subtree) = subtrees.iter().find(|t| t.zero_value() != zero_value) {
            return Err(TreeError::SubtreeZeroValueMismatch {
                expected: zero_value,
                actual: subtree.zero_value(),
            });
        }
        let zero_tree = SparseMerkleTree::empty(subtree_depth, zero_value)?;
        let combined = Self::combine(&subtrees, depth, &zero_tree)?;
        Ok(Self {
            subtrees,
            depth,
            zero_tree,
            combined,
        })
    }

    fn combine(
        subtrees: &[SparseMerkleTree<H>],
        depth: usize,
        zero_tree: &SparseMerkleTree<H>,
    ) -> Result<SparseMerkleTree<H>, TreeError> {
        let roots = subtrees.iter().map(SparseMerkleTree::root).collect();
        SparseMerkleTree::new(roots, depth, zero_tree.root())
    }

    /// Depth of the combining tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn subtree_depth(&self) -> usize {
        self.zero_tree.depth()
    }

    pub fn subtrees(&self) -> &[SparseMerkleTree<H>] {
        &self.subtrees
    }

    pub fn subtrees_count(&self) -> usize {
        1 << self.depth
    }

    pub fn leaf_count(&self) -> usize {
        self.subtrees_count() * self.zero_tree.leaf_count()
    }

    /// Subtree in slot `index`, the empty template for unpopulated slots.
    fn slot(&self, index: usize) -> &SparseMerkleTree<H> {
        self.subtrees.get(index).unwrap_or(&self.zero_tree)
    }

    /// Subtree index and position inside it of `leaf_id`.
    pub fn leaf_id_as_idx(&self, leaf_id: usize) -> Result<(usize, usize), TreeError> {
        let invalid = TreeError::InvalidLeafId {
            leaf_id,
            leaf_count: self.leaf_count(),
        };
        if leaf_id >= self.leaf_count() {
            return Err(invalid);
        }
        // TODO: every slot shares one depth, a division would do
        let mut first_leaf = 0;
        for index in 0..self.subtrees_count() {
            let size = self.slot(index).leaf_count();
            if leaf_id < first_leaf + size {
                return Ok((index, leaf_id - first_leaf));
            }
            first_leaf += size;
        }
        Err(invalid)
    }

    pub fn leaf(&self, leaf_id: usize) -> Result<FieldElement, TreeError> {
        let (index, local_index) = self.leaf_id_as_idx(leaf_id)?;
        self.slot(index).leaf(local_index)
    }

    pub fn is_full(&self) -> bool {
        self.subtrees.len() == self.subtrees_count() && self.subtrees.iter().all(|t| t.is_full())
    }

    /// Appends a leaf to the first subtree with room, opening a new subtree when
    /// all existing ones are full. Returns the leaf id.
    pub fn add_leaf(&mut self, value: FieldElement) -> Result<usize, TreeError> {
        let slot = match self.subtrees.iter().position(|t| !t.is_full()) {
            Some(slot) => slot,
            None if self.subtrees.len() < self.subtrees_count() => self.subtrees.len(),
            None => {
                return Err(TreeError::TreeOverflow {
                    capacity: self.leaf_count(),
                })
            }
        };
        let mut subtrees = self.subtrees.clone();
        if slot == subtrees.len() {
            debug!(slot, "opening subtree");
            subtrees.push(self.zero_tree.clone());
        }
        let local_index = subtrees[slot].add_leaf(value, false)?;
        let combined = Self::combine(&subtrees, self.depth, &self.zero_tree)?;
        self.subtrees = subtrees;
        self.combined = combined;
        Ok(slot * self.zero_tree.leaf_count() + local_index)
    }

    pub fn root(&self) -> FieldElement {
        self.combined.root()
    }

    /// Subtree siblings followed by the combining tree siblings.
    pub fn merkle_proof(&self, leaf_id: usize) -> Result<Proof, TreeError> {
        let (index, local_index) = self.leaf_id_as_idx(leaf_id)?;
        Ok(self
            .slot(index)
            .merkle_proof(local_index)?
            .concat(self.combined.merkle_proof(index)?))
    }

    /// Checks the subtree part of `proof` against the owning subtree, then the
    /// combining part against the root.
    pub fn verify_merkle_proof(
        &self,
        leaf: FieldElement,
        leaf_id: usize,
        proof: &Proof,
    ) -> Result<bool, TreeError> {
        let (index, local_index) = self.leaf_id_as_idx(leaf_id)?;
        let subtree = self.slot(index);
        if proof.len() != subtree.depth() + self.depth {
            return Ok(false);
        }
        let (lower, upper) = proof.split_at(subtree.depth());
        if !subtree.verify_merkle_proof(leaf, local_index, &lower)? {
            return Ok(false);
        }
        self.combined
            .verify_merkle_proof(subtree.root(), index, &upper)
    }
}

impl<H: Hasher> MerkleRoot for TreeOfTrees<H> {
    fn merkle_root(&self) -> FieldElement {
        self.root()
    }
}
