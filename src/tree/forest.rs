//! Forest tree over the roots of the taxi, bus, ferry and static trees.

use crate::{
    config::FOREST_TREE_DEPTH, FieldElement, Hasher, MerkleRoot, Proof, SparseMerkleTree,
    TreeError,
};

/// Leaves of the forest tree, in tree order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForestLeaf {
    Taxi = 0,
    Bus = 1,
    Ferry = 2,
    Static = 3,
}

impl ForestLeaf {
    pub const ALL: [ForestLeaf; 4] = [Self::Taxi, Self::Bus, Self::Ferry, Self::Static];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Depth 2 tree whose leaves are the four protocol tree roots, taken as is.
#[derive(Debug, Clone)]
pub struct ForestTree<H: Hasher> {
    tree: SparseMerkleTree<H>,
}

impl<H: Hasher> ForestTree<H> {
    /// Each input is either a built tree or its root.
    pub fn new(
        taxi: &impl MerkleRoot,
        bus: &impl MerkleRoot,
        ferry: &impl MerkleRoot,
        static_tree: &impl MerkleRoot,
    ) -> Result<Self, TreeError> {
        let leaves = vec![
            taxi.merkle_root(),
            bus.merkle_root(),
            ferry.merkle_root(),
            static_tree.merkle_root(),
        ];
        Ok(Self {
            tree: SparseMerkleTree::new(leaves, FOREST_TREE_DEPTH, FieldElement::from(0u64))?,
        })
    }

    /// Forest root of the four inputs, without keeping the tree.
    pub fn compute_root(
        taxi: &impl MerkleRoot,
        bus: &impl MerkleRoot,
        ferry: &impl MerkleRoot,
        static_tree: &impl MerkleRoot,
    ) -> Result<FieldElement, TreeError> {
        Ok(Self::new(taxi, bus, ferry, static_tree)?.root())
    }

    pub fn root(&self) -> FieldElement {
        self.tree.root()
    }

    pub fn leaf(&self, leaf: ForestLeaf) -> FieldElement {
        self.tree.leaves()[leaf.index()]
    }

    /// Two sibling path from one of the four roots to the forest root.
    pub fn merkle_proof(&self, leaf: ForestLeaf) -> Result<Proof, TreeError> {
        self.tree.merkle_proof(leaf.index())
    }

    pub fn verify_merkle_proof(
        &self,
        root: FieldElement,
        leaf: ForestLeaf,
        proof: &Proof,
    ) -> Result<bool, TreeError> {
        self.tree.verify_merkle_proof(root, leaf.index(), proof)
    }
}

impl<H: Hasher> MerkleRoot for ForestTree<H> {
    fn merkle_root(&self) -> FieldElement {
        self.root()
    }
}
