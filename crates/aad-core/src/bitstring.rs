//! An ordered bit sequence used as node labels, key/value digests, and AT
//! paths throughout the dictionary. Length is explicit (never inferred from
//! a byte count), so the empty string is a distinct, valid value.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{AadError, Result};

/// An ordered, explicitly-lengthed sequence of bits.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    /// The empty bit string (a valid value, not an error case).
    pub fn empty() -> Self {
        Self { bits: Vec::new() }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for the empty bit string.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Appends one bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Bit at position `i`, left-to-right.
    pub fn get(&self, i: usize) -> bool {
        self.bits[i]
    }

    /// Flips the last bit. Rejects the empty bit string, which has no
    /// sibling.
    pub fn sibling(&self) -> Result<Self> {
        if self.is_empty() {
            return Err(AadError::ProtocolViolation(
                "empty bit string has no sibling".into(),
            ));
        }
        let mut out = self.clone();
        let last = out.bits.len() - 1;
        out.bits[last] = !out.bits[last];
        Ok(out)
    }

    /// Reverses bit order, returning a new bit string.
    pub fn reversed(&self) -> Self {
        let mut bits = self.bits.clone();
        bits.reverse();
        Self { bits }
    }

    /// Appends a byte's bits least-significant-bit first, matching the
    /// reference implementation's convention for hashing raw byte buffers.
    pub fn push_byte(&mut self, byte: u8) {
        for i in 0..8u8 {
            self.bits.push((byte >> i) & 1 == 1);
        }
    }

    /// Builds a bit string from a byte buffer (e.g. a SHA-256 digest),
    /// pushing each byte LSB-first.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut out = Self::empty();
        for &b in bytes {
            out.push_byte(b);
        }
        out
    }

    /// Builds the `num_bits`-wide binary representation of `index`,
    /// most-significant-bit first. Used to address a leaf's position
    /// within a perfectly-balanced subtree by its 0-based index.
    pub fn from_index(index: usize, num_bits: usize) -> Self {
        let mut out = Self::empty();
        for i in (0..num_bits).rev() {
            out.push(((index >> i) & 1) == 1);
        }
        out
    }

    /// Concatenates `other` onto the end of `self`.
    pub fn extend_from(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Returns a new bit string equal to `self` followed by `other`.
    pub fn concat(&self, other: &BitString) -> Self {
        let mut out = self.clone();
        out.extend_from(other);
        out
    }

    /// First `n` bits, as a new bit string.
    pub fn prefix(&self, n: usize) -> Self {
        Self {
            bits: self.bits[..n].to_vec(),
        }
    }

    /// True if `self` is a prefix of `other` (including equality).
    pub fn is_prefix_of(&self, other: &BitString) -> bool {
        self.len() <= other.len() && self.bits[..] == other.bits[..self.len()]
    }

    /// ASCII rendering as a string of `'0'`/`'1'` characters. Used as the
    /// input to `hashToField`, which hashes this rendering rather than the
    /// raw bits.
    pub fn to_bit_string(&self) -> String {
        self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({})", self.to_bit_string())
    }
}

impl PartialOrd for BitString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitString {
    fn cmp(&self, other: &Self) -> Ordering {
        // Length-first, then bitwise lexicographic.
        self.len().cmp(&other.len()).then_with(|| self.bits.cmp(&other.bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_sibling() {
        assert!(BitString::empty().sibling().is_err());
    }

    #[test]
    fn sibling_flips_last_bit_only() {
        let mut bs = BitString::empty();
        bs.push(true);
        bs.push(false);
        let sib = bs.sibling().expect("non-empty bit string has a sibling");
        assert_eq!(sib.get(0), true);
        assert_eq!(sib.get(1), true);
    }

    #[test]
    fn byte_push_is_lsb_first() {
        let bs = BitString::from_bytes(&[0b0000_0001]);
        assert_eq!(bs.len(), 8);
        assert!(bs.get(0));
        for i in 1..8 {
            assert!(!bs.get(i));
        }
    }

    #[test]
    fn ordering_is_length_first_then_bitwise() {
        let mut short = BitString::empty();
        short.push(true);
        short.push(true);

        let mut long = BitString::empty();
        long.push(false);
        long.push(false);
        long.push(false);

        assert!(short < long);
    }

    #[test]
    fn prefix_and_is_prefix_of() {
        let mut bs = BitString::empty();
        for b in [true, false, true, true] {
            bs.push(b);
        }
        let p = bs.prefix(2);
        assert!(p.is_prefix_of(&bs));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn from_index_round_trips_msb_first() {
        let bs = BitString::from_index(0b101, 3);
        assert_eq!(bs.to_bit_string(), "101");
    }
}
