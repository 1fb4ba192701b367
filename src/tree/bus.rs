//! Bus tree: UTXO packs grouped into branches grouped under one root.
//!
//! A [`BusTree`] is the view of a single UTXO pack together with the branch and
//! the root above it. The roots of the packs already inserted in the current
//! branch, and of the branches already inserted in the tree, live in a
//! [`BusLedger`] owned by the caller. Each construction reads the left siblings
//! from the ledger and writes its own pack root and branch root back.

use tracing::debug;

use crate::{
    config::BusTreeConfig, error::BusTier, field::field_to_hex, walk_up, EmptyTree, FieldElement,
    Hasher, MerkleRoot, Proof, SparseMerkleTree, TreeError,
};

/// Roots threaded from one bus tree construction to the next.
///
/// Constructions take the ledger by `&mut`, so at most one construction writes a
/// given ledger at a time. The pack roots belong to a single branch: start a new
/// branch with [`BusLedger::start_branch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusLedger {
    roots_of_utxo_packs_in_branch: Vec<FieldElement>,
    roots_of_branches: Vec<FieldElement>,
}

impl BusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger resuming from previously computed roots.
    pub fn from_roots(
        roots_of_utxo_packs_in_branch: Vec<FieldElement>,
        roots_of_branches: Vec<FieldElement>,
    ) -> Self {
        Self {
            roots_of_utxo_packs_in_branch,
            roots_of_branches,
        }
    }

    pub fn roots_of_utxo_packs_in_branch(&self) -> &[FieldElement] {
        &self.roots_of_utxo_packs_in_branch
    }

    pub fn roots_of_branches(&self) -> &[FieldElement] {
        &self.roots_of_branches
    }

    /// Forgets the pack roots of the current branch.
    pub fn start_branch(&mut self) {
        self.roots_of_utxo_packs_in_branch.clear();
    }
}

/// Writes `root` at `index` of a root array holding at least `index` entries.
fn write_root(roots: &mut Vec<FieldElement>, index: usize, root: FieldElement) {
    if index == roots.len() {
        roots.push(root);
    } else {
        roots[index] = root;
    }
}

fn check_prior_roots(tier: BusTier, roots: &[FieldElement], index: usize) -> Result<(), TreeError> {
    if roots.len() < index {
        return Err(TreeError::InsufficientPriorRoots {
            tier,
            required: index,
            available: roots.len(),
        });
    }
    Ok(())
}

/// Pack, branch and root tiers above one UTXO pack.
#[derive(Debug, Clone)]
pub struct BusTree<H: Hasher> {
    config: BusTreeConfig,
    utxo_pack_index: usize,
    branch_index: usize,
    utxo_pack: SparseMerkleTree<H>,
    branch: SparseMerkleTree<H>,
    root: SparseMerkleTree<H>,
}

impl<H: Hasher> BusTree<H> {
    /// Builds the tiers above the pack whose left-most leaf is `left_leaf_index`.
    ///
    /// The ledger must already hold the roots of every pack on the left in the
    /// same branch and of every branch on the left. It is updated with the new
    /// pack and branch roots only when the construction succeeds.
    pub fn new(
        left_leaf_index: usize,
        leaves_of_utxo_pack: Vec<FieldElement>,
        ledger: &mut BusLedger,
        config: &BusTreeConfig,
    ) -> Result<Self, TreeError> {
        config.validate()?;
        let utxo_pack_index =
            (left_leaf_index >> config.utxo_pack_depth) % (1 << config.branch_depth);
        check_prior_roots(
            BusTier::Branch,
            &ledger.roots_of_utxo_packs_in_branch,
            utxo_pack_index,
        )?;

        let utxo_pack = SparseMerkleTree::new(
            leaves_of_utxo_pack,
            config.utxo_pack_depth,
            config.zero_value,
        )?;
        let mut roots_of_utxo_packs_in_branch = ledger.roots_of_utxo_packs_in_branch.clone();
        write_root(
            &mut roots_of_utxo_packs_in_branch,
            utxo_pack_index,
            utxo_pack.root(),
        );

        let branch = SparseMerkleTree::new(
            roots_of_utxo_packs_in_branch.clone(),
            config.branch_depth,
            utxo_pack.default_root(),
        )?;

        let branch_index = (left_leaf_index >> (config.utxo_pack_depth + config.branch_depth))
            % (1 << config.root_depth());
        check_prior_roots(BusTier::Root, &ledger.roots_of_branches, branch_index)?;
        let mut roots_of_branches = ledger.roots_of_branches.clone();
        write_root(&mut roots_of_branches, branch_index, branch.root());

        let root = SparseMerkleTree::new(
            roots_of_branches.clone(),
            config.root_depth(),
            branch.default_root(),
        )?;

        ledger.roots_of_utxo_packs_in_branch = roots_of_utxo_packs_in_branch;
        ledger.roots_of_branches = roots_of_branches;
        debug!(
            left_leaf_index,
            utxo_pack_index,
            branch_index,
            root = %field_to_hex(&root.root()),
            "built bus tree"
        );

        Ok(Self {
            config: *config,
            utxo_pack_index,
            branch_index,
            utxo_pack,
            branch,
            root,
        })
    }

    pub fn config(&self) -> &BusTreeConfig {
        &self.config
    }

    /// Position of the pack inside its branch.
    pub fn utxo_pack_index(&self) -> usize {
        self.utxo_pack_index
    }

    /// Position of the branch inside the tree.
    pub fn branch_index(&self) -> usize {
        self.branch_index
    }

    pub fn utxo_pack_root(&self) -> FieldElement {
        self.utxo_pack.root()
    }

    pub fn branch_root(&self) -> FieldElement {
        self.branch.root()
    }

    pub fn root(&self) -> FieldElement {
        self.root.root()
    }

    /// Roots of empty subtrees at every level of the whole bus tree.
    pub fn default_hashes(&self) -> Result<Vec<FieldElement>, TreeError> {
        EmptyTree::<H>::build(self.config.zero_value, self.config.depth)
    }

    /// Position of `leaf_index` inside this pack, failing for leaves of other packs.
    fn local_index(&self, leaf_index: usize) -> Result<usize, TreeError> {
        let leaf_count = 1usize << self.config.depth;
        if leaf_index >= leaf_count {
            return Err(TreeError::InvalidIndex {
                index: leaf_index,
                bound: leaf_count,
            });
        }
        let pack_depth = self.config.utxo_pack_depth;
        let own = (self.branch_index << self.config.branch_depth) | self.utxo_pack_index;
        let actual = leaf_index >> pack_depth;
        if actual != own {
            return Err(TreeError::PackMismatch {
                leaf_index,
                expected: own,
                actual,
            });
        }
        Ok(leaf_index % (1 << pack_depth))
    }

    /// Leaf of this pack at the absolute index `leaf_index`.
    pub fn leaf(&self, leaf_index: usize) -> Result<FieldElement, TreeError> {
        self.utxo_pack.leaf(self.local_index(leaf_index)?)
    }

    /// Proof of a leaf of this pack: pack, branch then root tier siblings.
    pub fn merkle_proof(&self, leaf_index: usize) -> Result<Proof, TreeError> {
        let local_index = self.local_index(leaf_index)?;
        Ok(self
            .utxo_pack
            .merkle_proof(local_index)?
            .concat(self.branch.merkle_proof(self.utxo_pack_index)?)
            .concat(self.root.merkle_proof(self.branch_index)?))
    }

    /// Checks `leaf` is the stored leaf at `leaf_index` and that `proof` leads from
    /// it to the root.
    pub fn verify_merkle_proof(
        &self,
        leaf: FieldElement,
        leaf_index: usize,
        proof: &Proof,
    ) -> Result<bool, TreeError> {
        let local_index = self.local_index(leaf_index)?;
        if self.utxo_pack.leaf(local_index)? != leaf {
            return Err(TreeError::LeafMismatch);
        }
        if proof.len() != self.config.depth {
            return Ok(false);
        }
        Ok(walk_up::<H>(leaf, leaf_index, proof.siblings())? == self.root())
    }
}

impl<H: Hasher> MerkleRoot for BusTree<H> {
    fn merkle_root(&self) -> FieldElement {
        self.root()
    }
}

#[cfg(test)]
mod test {
    use sha2::Sha256;

    use super::{BusLedger, BusTree};
    use crate::{
        config::BusTreeConfig, error::BusTier, FieldElement, SparseMerkleTree, TreeError,
    };

    fn fe(value: u64) -> FieldElement {
        FieldElement::from(value)
    }

    fn leaves(range: std::ops::Range<u64>) -> Vec<FieldElement> {
        range.map(fe).collect()
    }

    fn config() -> BusTreeConfig {
        BusTreeConfig::new(2, 2, 6).with_zero_value(fe(0))
    }

    #[test]
    fn test_first_pack() {
        let mut ledger = BusLedger::new();
        let bus = BusTree::<Sha256>::new(0, leaves(0..4), &mut ledger, &config()).unwrap();
        assert_eq!(bus.utxo_pack_index(), 0);
        assert_eq!(bus.branch_index(), 0);
        assert_eq!(ledger.roots_of_utxo_packs_in_branch(), &[bus.utxo_pack_root()]);
        assert_eq!(ledger.roots_of_branches(), &[bus.branch_root()]);
        let flat = SparseMerkleTree::<Sha256>::new(leaves(0..4), 6, fe(0)).unwrap();
        assert_eq!(bus.root(), flat.root());
    }

    #[test]
    fn test_matches_flat_tree_across_branches() {
        let config = config();
        let mut ledger = BusLedger::new();
        let mut bus = None;
        // packs of 4 leaves, branches of 4 packs, 5 packs span two branches
        for pack in 0..5u64 {
            if pack == 4 {
                ledger.start_branch();
            }
            let left_leaf_index = (pack * 4) as usize;
            bus = Some(
                BusTree::<Sha256>::new(
                    left_leaf_index,
                    leaves(pack * 4..pack * 4 + 4),
                    &mut ledger,
                    &config,
                )
                .unwrap(),
            );
        }
        let bus = bus.unwrap();
        assert_eq!(bus.utxo_pack_index(), 0);
        assert_eq!(bus.branch_index(), 1);
        assert_eq!(ledger.roots_of_branches().len(), 2);
        let flat = SparseMerkleTree::<Sha256>::new(leaves(0..20), 6, fe(0)).unwrap();
        assert_eq!(bus.root(), flat.root());
        assert_eq!(bus.merkle_proof(17).unwrap(), flat.merkle_proof(17).unwrap());
        assert_eq!(bus.default_hashes().unwrap(), flat.default_hashes());
    }

    #[test]
    fn test_partial_pack_rewritten() {
        let config = config();
        let mut ledger = BusLedger::new();
        BusTree::<Sha256>::new(0, leaves(0..2), &mut ledger, &config).unwrap();
        let bus = BusTree::<Sha256>::new(0, leaves(0..4), &mut ledger, &config).unwrap();
        assert_eq!(ledger.roots_of_utxo_packs_in_branch().len(), 1);
        assert_eq!(ledger.roots_of_branches().len(), 1);
        let flat = SparseMerkleTree::<Sha256>::new(leaves(0..4), 6, fe(0)).unwrap();
        assert_eq!(bus.root(), flat.root());
    }

    #[test]
    fn test_missing_prior_pack_roots() {
        let mut ledger = BusLedger::new();
        assert_eq!(
            BusTree::<Sha256>::new(8, leaves(0..4), &mut ledger, &config()).unwrap_err(),
            TreeError::InsufficientPriorRoots {
                tier: BusTier::Branch,
                required: 2,
                available: 0
            }
        );
        assert_eq!(ledger, BusLedger::new());
    }

    #[test]
    fn test_missing_prior_branch_roots() {
        let mut ledger = BusLedger::new();
        // pack 0 of branch 2
        assert_eq!(
            BusTree::<Sha256>::new(32, leaves(0..4), &mut ledger, &config()).unwrap_err(),
            TreeError::InsufficientPriorRoots {
                tier: BusTier::Root,
                required: 2,
                available: 0
            }
        );
        // nothing is committed on failure
        assert_eq!(ledger, BusLedger::new());
    }

    #[test]
    fn test_invalid_depths() {
        let mut ledger = BusLedger::new();
        assert!(matches!(
            BusTree::<Sha256>::new(0, vec![], &mut ledger, &BusTreeConfig::new(2, 4, 6)),
            Err(TreeError::InvalidDepths { .. })
        ));
    }

    #[test]
    fn test_pack_too_large() {
        let mut ledger = BusLedger::new();
        assert_eq!(
            BusTree::<Sha256>::new(0, leaves(0..5), &mut ledger, &config()).unwrap_err(),
            TreeError::TreeFull { capacity: 4 }
        );
    }

    #[test]
    fn test_proof_outside_pack() {
        let mut ledger = BusLedger::new();
        let bus = BusTree::<Sha256>::new(0, leaves(0..4), &mut ledger, &config()).unwrap();
        assert_eq!(
            bus.merkle_proof(5),
            Err(TreeError::PackMismatch {
                leaf_index: 5,
                expected: 0,
                actual: 1
            })
        );
        // same position in another branch
        assert!(matches!(
            bus.merkle_proof(16),
            Err(TreeError::PackMismatch { actual: 4, .. })
        ));
    }

    #[test]
    fn test_leaf_index_beyond_tree() {
        let mut ledger = BusLedger::new();
        let bus = BusTree::<Sha256>::new(0, leaves(0..4), &mut ledger, &config()).unwrap();
        let proof = bus.merkle_proof(1).unwrap();
        // 65 is leaf 1 of a second depth 6 tree
        let out_of_range = TreeError::InvalidIndex {
            index: 65,
            bound: 64,
        };
        assert_eq!(bus.merkle_proof(65), Err(out_of_range.clone()));
        assert_eq!(bus.leaf(65), Err(out_of_range.clone()));
        assert_eq!(bus.verify_merkle_proof(fe(1), 65, &proof), Err(out_of_range));
        assert!(bus.verify_merkle_proof(fe(1), 1, &proof).unwrap());
    }

    #[test]
    fn test_verify() {
        let mut ledger = BusLedger::new();
        let bus = BusTree::<Sha256>::new(0, leaves(10..14), &mut ledger, &config()).unwrap();
        let proof = bus.merkle_proof(2).unwrap();
        assert_eq!(proof.len(), 6);
        assert!(bus.verify_merkle_proof(fe(12), 2, &proof).unwrap());
        assert_eq!(
            bus.verify_merkle_proof(fe(13), 2, &proof),
            Err(TreeError::LeafMismatch)
        );
        let wrong_position = bus.merkle_proof(3).unwrap();
        assert!(!bus.verify_merkle_proof(fe(12), 2, &wrong_position).unwrap());
    }
}
