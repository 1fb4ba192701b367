mod bus;
mod empty;
mod forest;
mod sparse;
mod subtree;
mod taxi;
mod tree_of_trees;

pub use bus::{BusLedger, BusTree};
pub use empty::EmptyTree;
pub use forest::{ForestLeaf, ForestTree};
pub use sparse::{SparseMerkleTree, MAX_DEPTH};
pub use subtree::Subtree;
pub use taxi::{TaxiHalf, TaxiTree};
pub use tree_of_trees::TreeOfTrees;

use crate::{FieldElement, Hasher, TreeError};

/// Anything a composite tree accepts in place of a subtree: a built tree or the
/// root it would produce.
pub trait MerkleRoot {
    fn merkle_root(&self) -> FieldElement;
}

impl MerkleRoot for FieldElement {
    fn merkle_root(&self) -> FieldElement {
        *self
    }
}

/// Walk up the tree from a leaf to the root.
/// * `leaf` - starting leaf.
/// * `index` - position of the leaf, its low bit at each level tells whether the
///   running node is a right child.
/// * `siblings` - All the sibling nodes on the path (from the leaf to the root).
pub fn walk_up<H: Hasher>(
    leaf: FieldElement,
    index: usize,
    siblings: &[FieldElement],
) -> Result<FieldElement, TreeError> {
    let mut current = leaf;
    let mut position = index;
    for sibling in siblings {
        // order the children based on the path
        current = if position & 1 == 1 {
            H::hash(&[*sibling, current])?
        } else {
            H::hash(&[current, *sibling])?
        };
        position >>= 1;
    }
    Ok(current)
}
