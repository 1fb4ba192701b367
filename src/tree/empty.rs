//! Roots of perfectly empty subtrees
use std::marker::PhantomData;

use crate::{FieldElement, Hasher, TreeError};

/// Helper struct to build the default hashes of an empty tree.
pub struct EmptyTree<H: Hasher>(PhantomData<H>);

impl<H: Hasher> EmptyTree<H> {
    /// Builds the `depth + 1` default hashes, `zero_value` first. Entry `i` is
    /// the root of an empty subtree of depth `i`.
    pub fn build(zero_value: FieldElement, depth: usize) -> Result<Vec<FieldElement>, TreeError> {
        let mut empty_tree = Vec::with_capacity(depth + 1);
        empty_tree.push(zero_value);

        for i in 1..=depth {
            let below = empty_tree[i - 1];
            empty_tree.push(H::hash(&[below, below])?);
        }
        Ok(empty_tree)
    }

    /// Root of an empty tree of the given depth.
    pub fn root(zero_value: FieldElement, depth: usize) -> Result<FieldElement, TreeError> {
        let mut root = zero_value;
        for _ in 0..depth {
            root = H::hash(&[root, root])?;
        }
        Ok(root)
    }
}
