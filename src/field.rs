//! Field elements of the BN254 scalar field and their encodings.

use ark_ff::{BigInteger, MontFp, PrimeField};

use crate::TreeError;

/// Element of the SNARK scalar field. Every leaf, node and root is one.
pub type FieldElement = ark_bn254::Fr;

/// Size of a big-endian encoded field element.
pub const FIELD_BYTES: usize = 32;

/// Zero leaf of the protocol trees, `keccak256("Pantherprotocol") mod p`.
pub const TAXI_ZERO_LEAF: FieldElement =
    MontFp!("2896678800030780677881716886212119387589061708732637213728415628433288554509");

/// Big-endian encoding of a field element.
pub fn field_to_bytes(element: &FieldElement) -> [u8; FIELD_BYTES] {
    let bytes = element.into_bigint().to_bytes_be();
    let mut encoded = [0u8; FIELD_BYTES];
    encoded[FIELD_BYTES - bytes.len()..].copy_from_slice(&bytes);
    encoded
}

/// Decodes a big-endian field element. Values not below the modulus are rejected.
pub fn field_from_bytes(bytes: &[u8; FIELD_BYTES]) -> Result<FieldElement, TreeError> {
    let element = FieldElement::from_be_bytes_mod_order(bytes);
    if field_to_bytes(&element) != *bytes {
        return Err(TreeError::NonCanonicalField);
    }
    Ok(element)
}

/// `0x` prefixed, zero padded hex encoding.
pub fn field_to_hex(element: &FieldElement) -> String {
    format!("0x{}", hex::encode(field_to_bytes(element)))
}

/// Parses a hex field element, with or without `0x` prefix.
pub fn field_from_hex(text: &str) -> Result<FieldElement, TreeError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let raw = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    }
    .map_err(|e| TreeError::InvalidFieldEncoding(e.to_string()))?;
    if raw.len() > FIELD_BYTES {
        return Err(TreeError::InvalidFieldEncoding(format!(
            "{} bytes exceed a field element",
            raw.len()
        )));
    }
    let mut bytes = [0u8; FIELD_BYTES];
    bytes[FIELD_BYTES - raw.len()..].copy_from_slice(&raw);
    field_from_bytes(&bytes).map_err(|_| {
        TreeError::InvalidFieldEncoding(format!("{text} is not below the field modulus"))
    })
}

/// Serde adapter storing field elements as hex strings.
pub mod serde_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{field_from_hex, field_to_hex, FieldElement};

    pub fn serialize<S: Serializer>(
        element: &FieldElement,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&field_to_hex(element))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<FieldElement, D::Error> {
        let text = String::deserialize(deserializer)?;
        field_from_hex(&text).map_err(serde::de::Error::custom)
    }
}
