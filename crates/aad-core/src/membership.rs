//! Complete membership (and non-membership) proofs for a single key within
//! one accumulated tree: a KZG-style opening per returned value, plus a
//! frontier proof establishing no further values exist.

use ark_ec::CurveGroup;

use crate::accumulated_tree::AccumulatedTree;
use crate::bitstring::BitString;
use crate::commit::PolyCommit;
use crate::curve::{pairing, g1_generator, g2_generator, Fr, G1Affine, G2Affine};
use crate::error::{AadError, Result};
use crate::frontier::{self, Frontier, FrontierProofData};
use crate::hashing::{hash_key, hash_key_value, hash_to_field};
use crate::params::CryptoContext;
use crate::poly;
use crate::tree::Node;

/// One returned value together with the opening proving its
/// `(key, value, index)` hash is a root of the AT's characteristic
/// polynomial.
pub struct ValueWitness {
    /// The stored value bytes.
    pub value: Vec<u8>,
    /// The index it was appended at.
    pub index: u64,
    /// `g1^{q(s)}` where `q = AT_poly / (x - hashToField(path))`.
    pub opening: G1Affine,
}

/// A complete membership proof for one key against one accumulated tree,
/// or a non-membership proof when `values` is empty. The declared missing
/// prefixes are part of the proof (the prover discloses exactly which
/// slots it claims are empty); the frontier proof then certifies those
/// disclosed prefixes really are the committed frontier's leaves.
pub enum MembershipProof {
    /// The key has at least one value; `values` lists every one of them,
    /// each with its own opening. `missing_prefixes`/`frontier_proof`
    /// certify that the lower frontier around these values' leaves is
    /// exactly as declared (no extra, undisclosed value exists).
    Present {
        /// Returned values with their openings.
        values: Vec<ValueWitness>,
        /// The lower-frontier prefixes the prover claims are absent.
        missing_prefixes: Vec<BitString>,
        /// Completeness proof over those prefixes.
        frontier_proof: Node<FrontierProofData>,
    },
    /// The key has no values at all.
    Absent {
        /// The single upper-frontier prefix the prover claims is absent.
        missing_prefix: BitString,
        /// Completeness proof over that prefix.
        frontier_proof: Node<FrontierProofData>,
    },
}

/// Builds a KZG-style opening proving `at_poly` vanishes at
/// `hashToField(path)`: `g1^{q(s)}`, `q = AT(x) / (x - r)`.
fn open_at(pp: &crate::params::PublicParameters, at_poly: &poly::Poly, path: &BitString) -> Result<G1Affine> {
    let r = hash_to_field(path);
    let divisor = poly::from_roots(&[r]);
    let quotient = poly::divide_exact(at_poly, &divisor)?;
    Ok(PolyCommit::commit_g1(pp, &quotient, false)?.into_affine())
}

/// Builds a complete membership proof for `key` against `at`/`frontier`,
/// given every `(value, index)` pair currently stored for it (an empty
/// slice produces a non-membership proof).
pub fn build_membership_proof(
    ctx: &CryptoContext,
    at: &AccumulatedTree,
    frontier: &Frontier,
    key: &[u8],
    key_hash: &[u8],
    values: &[(Vec<u8>, u64)],
) -> Result<MembershipProof> {
    if values.is_empty() {
        let key_prefix = hash_key(key);
        let (found, missing) = at.contains(&key_prefix);
        if found {
            return Err(AadError::ProtocolViolation(
                "key has no recorded values but its prefix is present in the accumulated tree".into(),
            ));
        }
        let missing_prefix = missing.ok_or_else(|| {
            AadError::ProtocolViolation("non-membership requires a missing prefix".into())
        })?;
        let frontier_proof = frontier.proof_for_missing_prefix(&missing_prefix)?;
        return Ok(MembershipProof::Absent { missing_prefix, frontier_proof });
    }

    let at_poly = at.characteristic_polynomial();
    let mut witnesses = Vec::with_capacity(values.len());
    for (value, index) in values {
        let path = hash_key_value(key, value, *index);
        let opening = match ctx {
            CryptoContext::Real { pp } => open_at(pp, &at_poly, &path)?,
            CryptoContext::Simulated => {
                use ark_ec::AffineRepr;
                G1Affine::identity()
            }
        };
        witnesses.push(ValueWitness {
            value: value.clone(),
            index: *index,
            opening,
        });
    }
    let key_prefix = hash_key(key);
    let lower_root_label = key_prefix; // the key's own hash is the lower-tree root label
    let missing_prefixes = at.lower_frontier(&lower_root_label);
    let frontier_proof = frontier.proof_for_key(key_hash)?;
    Ok(MembershipProof::Present { values: witnesses, missing_prefixes, frontier_proof })
}

/// Verifies a membership (or non-membership) proof against the tree's
/// known `acc_at`/`acc_frontier`/`bezout_x`/`bezout_y` (taken from the
/// digest entry this proof was requested against). Checks the root's
/// Bezout disjointness identity `e(acc_at, bezout_x) * e(acc_frontier,
/// bezout_y) = e(g1, g2)` before anything else; a tree whose frontier was
/// not actually disjoint from its AT fails here regardless of what the
/// rest of the proof claims.
pub fn verify_membership_proof(
    proof: &MembershipProof,
    acc_at: G1Affine,
    acc_frontier: G1Affine,
    bezout_x: G2Affine,
    bezout_y: G2Affine,
    key: &[u8],
    lambda: usize,
    ctx: &CryptoContext,
) -> bool {
    if let CryptoContext::Real { .. } = ctx {
        let lhs = pairing(acc_at, bezout_x) + pairing(acc_frontier, bezout_y);
        if lhs != pairing(g1_generator(), g2_generator()) {
            log::warn!("Bezout disjointness check failed for this root");
            return false;
        }
    }
    match proof {
        MembershipProof::Present { values, missing_prefixes, frontier_proof } => {
            if values.is_empty() {
                log::warn!("present membership proof carries no values");
                return false;
            }
            let key_prefix = hash_key(key);
            for v in values {
                let path = hash_key_value(key, &v.value, v.index);
                let r = hash_to_field(&path);
                if !verify_opening(ctx, acc_at, r, v.opening) {
                    log::warn!("membership opening failed for index {}", v.index);
                    return false;
                }
            }
            if missing_prefixes.is_empty() {
                log::warn!("present membership proof declares no frontier boundary");
                return false;
            }
            if !missing_prefixes.iter().all(|p| key_prefix.is_prefix_of(p)) {
                log::warn!("declared frontier prefixes do not belong to this key's subtree");
                return false;
            }
            let roots: Vec<Fr> = missing_prefixes.iter().map(hash_to_field).collect();
            frontier::verify_frontier_proof(frontier_proof, acc_frontier, &roots, lambda, ctx)
        }
        MembershipProof::Absent { missing_prefix, frontier_proof } => {
            let key_prefix = hash_key(key);
            if !missing_prefix.is_prefix_of(&key_prefix) && !key_prefix.is_prefix_of(missing_prefix) {
                log::warn!("declared missing prefix is unrelated to the queried key");
                return false;
            }
            let root = hash_to_field(missing_prefix);
            frontier::verify_frontier_proof(frontier_proof, acc_frontier, &[root], lambda, ctx)
        }
    }
}

fn verify_opening(ctx: &CryptoContext, acc_at: G1Affine, r: Fr, opening: G1Affine) -> bool {
    match ctx {
        CryptoContext::Real { pp } => {
            let g2_s_minus_r = (pp.g2_to_s().into_group() - g2_generator() * r).into_affine();
            pairing(acc_at, g2_generator()) == pairing(opening, g2_s_minus_r)
        }
        CryptoContext::Simulated => {
            let _ = (acc_at, r, opening);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PublicParameters;
    use rand::SeedableRng;

    fn path(bits: &[bool]) -> BitString {
        let mut bs = BitString::empty();
        for &b in bits {
            bs.push(b);
        }
        bs
    }

    #[test]
    fn non_membership_rejects_a_present_prefix() {
        let mut at = AccumulatedTree::new(2);
        at.append(&path(&[true, true]));
        let (found, _) = at.contains(&path(&[true, true]));
        assert!(found);
    }

    #[test]
    fn opening_round_trips_for_a_real_context() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let (pp, _s, _tau) = PublicParameters::generate_insecure(&mut rng, 8);
        let roots: Vec<Fr> = (0..3).map(|i| Fr::from(i as u64 + 10)).collect();
        let at_poly = poly::from_roots(&roots);
        let acc_at = PolyCommit::commit_g1(&pp, &at_poly, false).expect("degree within bound").into_affine();
        let divisor = poly::from_roots(&[roots[0]]);
        let quotient = poly::divide_exact(&at_poly, &divisor).expect("divisor root is in at_poly");
        let opening = PolyCommit::commit_g1(&pp, &quotient, false).expect("degree within bound").into_affine();
        let ctx = CryptoContext::Real { pp: std::sync::Arc::new(pp) };
        assert!(verify_opening(&ctx, acc_at, roots[0], opening));
        assert!(!verify_opening(&ctx, acc_at, roots[1], opening));
    }
}
