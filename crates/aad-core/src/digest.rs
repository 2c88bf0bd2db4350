//! The digest: a compact summary of the dictionary's current forest that
//! clients hold and proofs verify against.

use ark_serialize::CanonicalSerialize;

use crate::curve::{G1Affine, G2Affine};
use crate::hashing::MerkleHash;

/// One forest tree's contribution to the digest: its AT accumulator, its
/// frontier accumulator, the root's Bezout disjointness witnesses, and the
/// Merkle overlay hash rooted at it.
#[derive(Clone)]
pub struct DigestEntry {
    /// `acc_AT`, the accumulated tree's G1 commitment.
    pub acc_at: G1Affine,
    /// `acc_F`, the frontier's G1 commitment.
    pub acc_frontier: G1Affine,
    /// `X`, the G2 commitment to the Bezout cofactor of `acc_AT`, satisfying
    /// `e(acc_AT, X) * e(acc_F, Y) = e(g1, g2)`.
    pub bezout_x: G2Affine,
    /// `Y`, the G2 commitment to the Bezout cofactor of `acc_F`.
    pub bezout_y: G2Affine,
    /// The Merkle overlay hash for the tree this entry summarizes.
    pub merkle_hash: MerkleHash,
}

/// The forest's digest: one entry per tree, ordered largest/oldest first,
/// matching `Aad`'s internal tree list.
#[derive(Clone, Default)]
pub struct Digest {
    /// Per-tree entries, largest/oldest first.
    pub entries: Vec<DigestEntry>,
}

impl Digest {
    /// An empty digest (no appends yet).
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Total leaves this digest accounts for, assuming standard
    /// power-of-two tree sizes ordered largest first with the last entry
    /// possibly being a stray size-1 tree; callers that need the exact
    /// count track it separately (see [`crate::aad::Aad`]).
    pub fn num_trees(&self) -> usize {
        self.entries.len()
    }

    /// A human-readable, hex-summarized rendering for CLI display: one
    /// line per entry, `acc_AT`/`acc_F` as hex, Merkle hash as hex or
    /// `"unset"`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!(
                "tree[{i}]: acc_AT={} acc_F={} bezout_X={} bezout_Y={} merkle={}\n",
                hex_of_g1(&entry.acc_at),
                hex_of_g1(&entry.acc_frontier),
                hex_of_g2(&entry.bezout_x),
                hex_of_g2(&entry.bezout_y),
                entry
                    .merkle_hash
                    .bytes()
                    .map(hex::encode)
                    .unwrap_or_else(|| "unset".to_string()),
            ));
        }
        out
    }
}

fn hex_of_g1(p: &G1Affine) -> String {
    let mut bytes = Vec::new();
    p.serialize_compressed(&mut bytes)
        .expect("G1 compressed serialization is infallible for a valid point");
    hex::encode(bytes)
}

fn hex_of_g2(p: &G2Affine) -> String {
    let mut bytes = Vec::new();
    p.serialize_compressed(&mut bytes)
        .expect("G2 compressed serialization is infallible for a valid point");
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::AffineRepr;

    #[test]
    fn empty_digest_describes_as_empty_string() {
        assert_eq!(Digest::new().describe(), "");
    }

    #[test]
    fn describe_includes_one_line_per_entry() {
        let digest = Digest {
            entries: vec![DigestEntry {
                acc_at: G1Affine::identity(),
                acc_frontier: G1Affine::identity(),
                bezout_x: G2Affine::identity(),
                bezout_y: G2Affine::identity(),
                merkle_hash: MerkleHash::empty(),
            }],
        };
        assert_eq!(digest.describe().lines().count(), 1);
    }
}
