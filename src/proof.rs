//! Merkle paths.
//!
//! A proof is the bottom-up list of siblings from a leaf to a root. Proofs of
//! composite trees are the concatenation of the proofs of each tier.
//!
//! A proof can be compressed into a bitvector marking the siblings that equal the
//! default hash of their level, and back.

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

use crate::{
    field::{field_from_bytes, field_to_bytes, FIELD_BYTES},
    walk_up, FieldElement, Hasher, TreeError,
};

/// A merkle path, siblings ordered from the leaf level upwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Proof {
    siblings: Vec<FieldElement>,
}

impl Proof {
    /// Creates a new proof from a list of siblings.
    pub fn new(siblings: Vec<FieldElement>) -> Self {
        Self { siblings }
    }

    /// Returns the siblings in the proof.
    pub fn siblings(&self) -> &[FieldElement] {
        &self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Appends the proof of the tier above.
    pub fn concat(mut self, upper: Proof) -> Self {
        self.siblings.extend(upper.siblings);
        self
    }

    /// Splits into the `at` lowest levels and the levels above.
    /// `at` is clamped to the proof length.
    pub fn split_at(&self, at: usize) -> (Proof, Proof) {
        let (lower, upper) = self.siblings.split_at(at.min(self.siblings.len()));
        (Proof::new(lower.to_vec()), Proof::new(upper.to_vec()))
    }

    /// Root obtained by walking up from `leaf` at position `index`.
    pub fn root<H: Hasher>(
        &self,
        leaf: FieldElement,
        index: usize,
    ) -> Result<FieldElement, TreeError> {
        walk_up::<H>(leaf, index, &self.siblings)
    }

    /// Verifies the proof against a leaf, its position and the expected root.
    pub fn verify<H: Hasher>(
        &self,
        leaf: FieldElement,
        index: usize,
        root: FieldElement,
    ) -> Result<bool, TreeError> {
        Ok(self.root::<H>(leaf, index)? == root)
    }

    /// Compresses the proof. `default_hashes[level]` is the empty subtree root
    /// at each level of the tree the proof comes from.
    pub fn compress(&self, default_hashes: &[FieldElement]) -> CompressedProof {
        let mut bits = BitVec::with_capacity(self.siblings.len());
        let mut siblings = Vec::new();
        for (level, sibling) in self.siblings.iter().enumerate() {
            if default_hashes.get(level) == Some(sibling) {
                bits.push(true);
            } else {
                bits.push(false);
                siblings.push(*sibling);
            }
        }
        CompressedProof::new(siblings, bits)
    }
}

/// A compressed merkle proof.
/// Siblings equal to the default hash of their level are not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedProof {
    siblings: Vec<FieldElement>,
    bits: BitVec<u8, Lsb0>,
}

impl CompressedProof {
    /// Creates a new compressed proof from the kept siblings and a bitvector.
    pub fn new(siblings: Vec<FieldElement>, bits: BitVec<u8, Lsb0>) -> Self {
        Self { siblings, bits }
    }

    pub fn siblings(&self) -> &[FieldElement] {
        &self.siblings
    }

    pub fn bits(&self) -> &BitVec<u8, Lsb0> {
        &self.bits
    }

    /// Decompresses the proof into a proof.
    pub fn decompress(&self, default_hashes: &[FieldElement]) -> Result<Proof, TreeError> {
        if self.siblings.len() != self.bits.count_zeros() || default_hashes.len() < self.bits.len()
        {
            return Err(TreeError::InvalidCompressedProof);
        }
        let mut kept = self.siblings.iter();
        let mut siblings = Vec::with_capacity(self.bits.len());
        for (level, bit) in self.bits.iter().enumerate() {
            let sibling = if *bit {
                default_hashes[level]
            } else {
                *kept.next().ok_or(TreeError::InvalidCompressedProof)?
            };
            siblings.push(sibling);
        }
        Ok(Proof::new(siblings))
    }

    /// Encodes the proof into a byte vector:
    /// sibling count and bit count as big-endian `u16`, the siblings, then the bits.
    pub fn encode(&self) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(4 + self.siblings.len() * FIELD_BYTES);
        encoded.extend_from_slice(&(self.siblings.len() as u16).to_be_bytes());
        encoded.extend_from_slice(&(self.bits.len() as u16).to_be_bytes());
        for sibling in &self.siblings {
            encoded.extend_from_slice(&field_to_bytes(sibling));
        }
        encoded.extend_from_slice(self.bits.as_raw_slice());
        encoded
    }

    /// Decodes a proof from a byte vector.
    pub fn decode(data: &[u8]) -> Result<Self, TreeError> {
        let read_u16 = |at: usize| -> Result<usize, TreeError> {
            let bytes = data
                .get(at..at + 2)
                .ok_or(TreeError::InvalidCompressedProof)?;
            Ok(u16::from_be_bytes([bytes[0], bytes[1]]) as usize)
        };
        let nb_siblings = read_u16(0)?;
        let nb_bits = read_u16(2)?;
        let mut offset = 4;
        let mut siblings = Vec::with_capacity(nb_siblings);
        for _ in 0..nb_siblings {
            let bytes: [u8; FIELD_BYTES] = data
                .get(offset..offset + FIELD_BYTES)
                .and_then(|slice| slice.try_into().ok())
                .ok_or(TreeError::InvalidCompressedProof)?;
            siblings.push(field_from_bytes(&bytes)?);
            offset += FIELD_BYTES;
        }
        let raw_bits = &data[offset..];
        if raw_bits.len() != nb_bits.div_ceil(8) {
            return Err(TreeError::InvalidCompressedProof);
        }
        let mut bits = BitVec::<u8, Lsb0>::from_slice(raw_bits);
        bits.truncate(nb_bits);
        Ok(Self::new(siblings, bits))
    }
}
