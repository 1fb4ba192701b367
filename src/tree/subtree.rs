use crate::{FieldElement, Hasher, MerkleRoot, SparseMerkleTree};

/// A subtree of a composite tree, either built from its leaves or known only by
/// its root.
#[derive(Debug, Clone)]
pub enum Subtree<H: Hasher> {
    /// Precomputed root, no leaves are retained so no proof can be produced.
    Abstracted(FieldElement),
    /// Tree holding its leaves.
    Materialized(SparseMerkleTree<H>),
}

impl<H: Hasher> Subtree<H> {
    pub fn root(&self) -> FieldElement {
        match self {
            Self::Abstracted(root) => *root,
            Self::Materialized(tree) => tree.root(),
        }
    }

    pub fn as_tree(&self) -> Option<&SparseMerkleTree<H>> {
        match self {
            Self::Abstracted(_) => None,
            Self::Materialized(tree) => Some(tree),
        }
    }

    pub fn is_abstracted(&self) -> bool {
        matches!(self, Self::Abstracted(_))
    }
}

impl<H: Hasher> MerkleRoot for Subtree<H> {
    fn merkle_root(&self) -> FieldElement {
        self.root()
    }
}

impl<H: Hasher> From<SparseMerkleTree<H>> for Subtree<H> {
    fn from(tree: SparseMerkleTree<H>) -> Self {
        Self::Materialized(tree)
    }
}
