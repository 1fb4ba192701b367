//! Protocol constants and tree parameters

use serde::{Deserialize, Serialize};

use crate::{field::serde_hex, FieldElement, TreeError, MAX_DEPTH, TAXI_ZERO_LEAF};

/// Depth of a taxi tree, 256 leaves.
pub const TAXI_TREE_DEPTH: usize = 8;
/// Depth of each of the two taxi halves, 128 leaves.
pub const TAXI_SUBTREE_DEPTH: usize = TAXI_TREE_DEPTH - 1;
/// Depth of the forest tree over the taxi, bus, ferry and static roots.
pub const FOREST_TREE_DEPTH: usize = 2;

fn default_zero_value() -> FieldElement {
    TAXI_ZERO_LEAF
}

/// Shape of a bus tree.
///
/// ```json
/// { "utxoPackDepth": 2, "branchDepth": 2, "depth": 6 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusTreeConfig {
    /// Depth of one UTXO pack.
    pub utxo_pack_depth: usize,
    /// Depth of a branch over pack roots.
    pub branch_depth: usize,
    /// Total depth, the root tier covers `depth - utxo_pack_depth - branch_depth` levels.
    pub depth: usize,
    /// Value of the leaves not yet inserted.
    #[serde(with = "serde_hex", default = "default_zero_value")]
    pub zero_value: FieldElement,
}

impl BusTreeConfig {
    pub fn new(utxo_pack_depth: usize, branch_depth: usize, depth: usize) -> Self {
        Self {
            utxo_pack_depth,
            branch_depth,
            depth,
            zero_value: TAXI_ZERO_LEAF,
        }
    }

    pub fn with_zero_value(mut self, zero_value: FieldElement) -> Self {
        self.zero_value = zero_value;
        self
    }

    /// Checks every tier is at least one level deep and the whole fits [`MAX_DEPTH`].
    pub fn validate(&self) -> Result<(), TreeError> {
        let tiers_ok = self.utxo_pack_depth > 0
            && self.branch_depth > 0
            && self.depth > 0
            && self
                .utxo_pack_depth
                .checked_add(self.branch_depth)
                .is_some_and(|lower| lower < self.depth);
        if !tiers_ok {
            return Err(TreeError::InvalidDepths {
                utxo_pack_depth: self.utxo_pack_depth,
                branch_depth: self.branch_depth,
                depth: self.depth,
            });
        }
        if self.depth > MAX_DEPTH {
            return Err(TreeError::InvalidDepth {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }

    /// Depth of the root tier, zero for a config failing [`Self::validate`].
    pub fn root_depth(&self) -> usize {
        self.depth
            .saturating_sub(self.utxo_pack_depth)
            .saturating_sub(self.branch_depth)
    }
}

#[cfg(test)]
mod test {
    use super::BusTreeConfig;
    use crate::{FieldElement, TreeError, TAXI_ZERO_LEAF};

    #[test]
    fn test_load_from_json() {
        let config: BusTreeConfig =
            serde_json::from_str(r#"{ "utxoPackDepth": 2, "branchDepth": 3, "depth": 8 }"#)
                .unwrap();
        assert_eq!(config, BusTreeConfig::new(2, 3, 8));
        assert_eq!(config.zero_value, TAXI_ZERO_LEAF);
        assert_eq!(config.root_depth(), 3);
        config.validate().unwrap();
    }

    #[test]
    fn test_zero_value_round_trip() {
        let config = BusTreeConfig::new(1, 1, 3).with_zero_value(FieldElement::from(10u64));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(
            "\"zeroValue\":\"0x000000000000000000000000000000000000000000000000000000000000000a\""
        ));
        let loaded: BusTreeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_zero_value() {
        let loaded = serde_json::from_str::<BusTreeConfig>(
            r#"{ "utxoPackDepth": 1, "branchDepth": 1, "depth": 3, "zeroValue": "0xnope" }"#,
        );
        assert!(loaded.is_err());
    }

    #[test]
    fn test_validate_depths() {
        for (pack, branch, depth) in [(0, 2, 6), (2, 0, 6), (2, 2, 0), (2, 2, 4), (3, 3, 5)] {
            assert_eq!(
                BusTreeConfig::new(pack, branch, depth).validate(),
                Err(TreeError::InvalidDepths {
                    utxo_pack_depth: pack,
                    branch_depth: branch,
                    depth
                })
            );
        }
        assert!(matches!(
            BusTreeConfig::new(2, 2, 40).validate(),
            Err(TreeError::InvalidDepth { depth: 40, .. })
        ));
    }

    #[test]
    fn test_validate_huge_depths() {
        let config: BusTreeConfig = serde_json::from_str(
            r#"{ "utxoPackDepth": 18446744073709551615, "branchDepth": 1, "depth": 5 }"#,
        )
        .unwrap();
        assert_eq!(
            config.validate(),
            Err(TreeError::InvalidDepths {
                utxo_pack_depth: usize::MAX,
                branch_depth: 1,
                depth: 5
            })
        );
        assert_eq!(config.root_depth(), 0);
        let config = BusTreeConfig::new(2, usize::MAX, usize::MAX);
        assert!(config.validate().is_err());
        assert!(matches!(
            BusTreeConfig::new(2, 2, usize::MAX).validate(),
            Err(TreeError::InvalidDepth { .. })
        ));
    }
}
