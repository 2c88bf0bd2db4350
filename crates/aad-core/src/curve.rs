//! Bilinear-pairing group aliases.
//!
//! WARNING: assumes BN254 (the arkworks-ecosystem member of the BN
//! family the reference implementation calls BN128). Element sizes below
//! are the compressed `CanonicalSerialize` encodings of this curve and are
//! load-bearing for the wire-size accounting in `proof.rs`/`frontier.rs`.

use ark_bn254::Bn254;
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::CurveGroup;

/// Scalar field of the pairing groups.
pub type Fr = ark_bn254::Fr;
/// G1 in projective form.
pub type G1 = ark_bn254::G1Projective;
/// G1 in affine form (what gets committed/serialized).
pub type G1Affine = ark_bn254::G1Affine;
/// G2 in projective form.
pub type G2 = ark_bn254::G2Projective;
/// G2 in affine form.
pub type G2Affine = ark_bn254::G2Affine;
/// Target group of the pairing.
pub type Gt = PairingOutput<Bn254>;

/// Compressed encoding size, in bytes, of a G1 element on this curve.
pub const G1_ELEMENT_SIZE: usize = 32;
/// Compressed encoding size, in bytes, of a G2 element on this curve.
pub const G2_ELEMENT_SIZE: usize = 64;
/// Size, in bytes, of a Merkle hash node.
pub const MERKLE_HASH_SIZE: usize = 32;

/// `e(g1, g2)`, the reduced pairing.
pub fn pairing(g1: G1Affine, g2: G2Affine) -> Gt {
    Bn254::pairing(g1, g2)
}

/// `g1` generator in affine form.
pub fn g1_generator() -> G1Affine {
    use ark_ec::Group;
    G1::generator().into_affine()
}

/// `g2` generator in affine form.
pub fn g2_generator() -> G2Affine {
    use ark_ec::Group;
    G2::generator().into_affine()
}
