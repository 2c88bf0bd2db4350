//! Hashes of keys, values, and key/value/index triples into `BitString`s
//! and into scalar-field elements, plus the Merkle overlay's node hash.

use ark_ff::PrimeField;
use sha2::{Digest, Sha256};

use crate::bitstring::BitString;
use crate::curve::{Fr, G1Affine};

/// `H_K(k) = SHA-256(k)`, as a 256-bit bit string.
pub fn hash_key(key: &[u8]) -> BitString {
    BitString::from_bytes(&Sha256::digest(key))
}

/// `H_V(v, i) = SHA-256( SHA-256(v) || SHA-256(dec(i)) )`, as a 256-bit bit
/// string.
pub fn hash_value(value: &[u8], index: u64) -> BitString {
    let value_digest = Sha256::digest(value);
    let index_digest = Sha256::digest(index.to_string().as_bytes());
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(&value_digest);
    buf.extend_from_slice(&index_digest);
    BitString::from_bytes(&Sha256::digest(&buf))
}

/// `H_KV(k, v, i) = H_K(k) || H_V(v, i)`, the 512-bit AT path for the
/// `(k, v)` pair appended at index `i`.
pub fn hash_key_value(key: &[u8], value: &[u8], index: u64) -> BitString {
    hash_key(key).concat(&hash_value(value, index))
}

/// Hashes a bit string's `'0'`/`'1'` ASCII rendering (not its raw bits) to a
/// scalar-field element: SHA-256 the rendering, drop the digest's last hex
/// nibble (the remaining 63 hex characters always fit unreduced below the
/// field modulus), and reduce the result mod the field order.
pub fn hash_to_field(bits: &BitString) -> Fr {
    let rendering = bits.to_bit_string();
    let digest = Sha256::digest(rendering.as_bytes());
    let mut hex = hex::encode(digest);
    hex.pop();
    // Hex::decode requires an even number of digits; padding the front
    // with a zero nibble doesn't change the represented integer.
    if hex.len() % 2 == 1 {
        hex.insert(0, '0');
    }
    let bytes = hex::decode(&hex).expect("hex string built from hex::encode output");
    Fr::from_be_bytes_mod_order(&bytes)
}

/// The Merkle overlay's node hash. Three states are distinguished: unset
/// (never computed), `empty()` (32 zero bytes), and `dummy()` (32 `0xFF`
/// bytes, used only in simulate mode) — `empty()` and `dummy()` are regular
/// set values, not synonyms for "unset".
#[derive(Clone, PartialEq, Eq)]
pub enum MerkleHash {
    /// No hash has been computed for this node yet.
    Unset,
    /// A computed (or sentinel) 32-byte hash.
    Set([u8; 32]),
}

impl MerkleHash {
    /// The all-zero sentinel.
    pub fn empty() -> Self {
        MerkleHash::Set([0u8; 32])
    }

    /// The all-ones sentinel, used by simulate mode in place of a real hash.
    pub fn dummy() -> Self {
        MerkleHash::Set([0xFFu8; 32])
    }

    /// True only for the `Unset` variant.
    pub fn is_unset(&self) -> bool {
        matches!(self, MerkleHash::Unset)
    }

    /// The 32 hash bytes, if set.
    pub fn bytes(&self) -> Option<&[u8; 32]> {
        match self {
            MerkleHash::Set(b) => Some(b),
            MerkleHash::Unset => None,
        }
    }

    /// Leaf-node hash: `MerkleHash(acc, empty(), empty())`, i.e.
    /// `combine` with both children set to the all-zero sentinel rather
    /// than folding in nothing.
    pub fn from_leaf_accumulator(acc: &G1Affine) -> Self {
        MerkleHash::combine(acc, &MerkleHash::empty(), &MerkleHash::empty())
    }

    /// Internal-node hash: `SHA-256(left || hex(acc) || right)`.
    pub fn combine(acc: &G1Affine, left: &MerkleHash, right: &MerkleHash) -> Self {
        let mut hasher = Sha256::new();
        if let Some(l) = left.bytes() {
            hasher.update(l);
        }
        hasher.update(hex_of_g1(acc).as_bytes());
        if let Some(r) = right.bytes() {
            hasher.update(r);
        }
        MerkleHash::Set(hasher.finalize().into())
    }
}

/// A canonical byte identifier for a bit-string label, used to key
/// per-key bookkeeping (the frontier's leaf-to-key index, the
/// dictionary's value index) without re-deriving a key's hash bytes
/// every time.
pub fn label_identifier(label: &BitString) -> Vec<u8> {
    label.to_bit_string().into_bytes()
}

fn hex_of_g1(acc: &G1Affine) -> String {
    use ark_serialize::CanonicalSerialize;
    let mut bytes = Vec::new();
    acc.serialize_compressed(&mut bytes)
        .expect("G1 compressed serialization is infallible for a valid point");
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_key_value_is_512_bits() {
        let bs = hash_key_value(b"key", b"value", 0);
        assert_eq!(bs.len(), 512);
    }

    #[test]
    fn hash_to_field_is_deterministic() {
        let bs = hash_key(b"abc");
        assert_eq!(hash_to_field(&bs), hash_to_field(&bs));
    }

    #[test]
    fn merkle_hash_unset_differs_from_sentinels() {
        assert!(MerkleHash::Unset.is_unset());
        assert!(!MerkleHash::empty().is_unset());
        assert!(MerkleHash::empty() != MerkleHash::dummy());
    }
}
