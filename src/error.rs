//! Error types for the Merkle accumulators

use std::fmt::{self, Display};

use thiserror::Error;

use crate::FieldElement;

/// Tier of a bus tree whose root array is written by a construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusTier {
    /// Roots of the UTXO packs of one branch.
    Branch,
    /// Roots of the branches of the bus tree.
    Root,
}

impl Display for BusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusTier::Branch => f.write_str("branch"),
            BusTier::Root => f.write_str("root"),
        }
    }
}

/// Error type for tree operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Leaf or node index outside the valid range of the operation
    #[error("invalid index {index}, expected an index below {bound}")]
    InvalidIndex { index: usize, bound: usize },
    /// Depth larger than the supported maximum
    #[error("invalid depth {depth}, maximum supported depth is {max}")]
    InvalidDepth { depth: usize, max: usize },
    /// Bus tree depths violating `0 < pack`, `0 < branch`, `pack + branch < depth`
    #[error(
        "invalid bus tree depths: utxo pack {utxo_pack_depth}, branch {branch_depth}, total {depth}"
    )]
    InvalidDepths {
        utxo_pack_depth: usize,
        branch_depth: usize,
        depth: usize,
    },
    /// Insertion into a tree holding `2^depth` leaves
    #[error("tree is full ({capacity} leaves)")]
    TreeFull { capacity: usize },
    /// Insertion into a tree of trees whose every subtree is full
    #[error("tree of trees overflow ({capacity} leaves)")]
    TreeOverflow { capacity: usize },
    /// Left sibling roots missing from a bus ledger
    #[error("{tier} tier needs {required} prior roots, ledger holds {available}")]
    InsufficientPriorRoots {
        tier: BusTier,
        required: usize,
        available: usize,
    },
    /// Leaf not part of the UTXO pack a bus tree was built for
    #[error("leaf {leaf_index} belongs to pack {actual}, this bus tree holds pack {expected}")]
    PackMismatch {
        leaf_index: usize,
        expected: usize,
        actual: usize,
    },
    /// Proof requested against a half known only by its root
    #[error("taxi subtree {half} is abstracted and cannot produce proofs")]
    AbstractedSubtreeProof { half: usize },
    /// Claimed leaf differs from the stored one
    #[error("leaf does not match the stored value")]
    LeafMismatch,
    /// Taxi leaf index outside `[0, 256)`
    #[error("leaf index {index} out of bound {bound}")]
    LeafIndexOutOfBound { index: usize, bound: usize },
    /// Tree of trees leaf id outside `[0, leaf_count)`
    #[error("invalid leaf id {leaf_id}, tree holds {leaf_count} leaves")]
    InvalidLeafId { leaf_id: usize, leaf_count: usize },
    /// More subtrees than combining slots
    #[error("{count} subtrees given for {capacity} slots")]
    TooManySubtrees { count: usize, capacity: usize },
    /// Subtree of unexpected depth
    #[error("subtree depth {actual} differs from the expected {expected}")]
    SubtreeDepthMismatch { expected: usize, actual: usize },
    /// Subtree padded with another zero value than its siblings
    #[error("subtree zero value {actual} differs from the expected {expected}")]
    SubtreeZeroValueMismatch {
        expected: FieldElement,
        actual: FieldElement,
    },
    /// Hash arity not supported by the hasher
    #[error("unsupported hash arity {0}")]
    UnsupportedArity(usize),
    /// Hasher failure
    #[error("hasher error: {0}")]
    Hasher(String),
    /// Compressed proof whose bits and siblings disagree, or malformed bytes
    #[error("invalid compressed proof")]
    InvalidCompressedProof,
    /// 32 bytes that do not encode a reduced field element
    #[error("non canonical field element encoding")]
    NonCanonicalField,
    /// Unparsable field element text
    #[error("invalid field element encoding: {0}")]
    InvalidFieldEncoding(String),
}
