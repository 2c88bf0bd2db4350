//! The top-level dictionary: owns the append-only forest of accumulated
//! trees and frontiers, tracks per-version digests, and produces/verifies
//! membership and append-only proofs.

use std::collections::HashMap;
use std::sync::Arc;

use ark_ec::CurveGroup;

use crate::accumulated_tree::AccumulatedTree;
use crate::append_only::{self, MergeHistoryData};
use crate::bitstring::BitString;
use crate::commit::PolyCommit;
use crate::curve::{pairing, g1_generator, g2_generator, G1Affine, G2Affine};
use crate::digest::{Digest, DigestEntry};
use crate::error::{AadError, Result};
use crate::frontier::Frontier;
use crate::hashing::{self, hash_key, MerkleHash};
use crate::membership::{self, MembershipProof};
use crate::params::{CryptoContext, PublicParameters};
use crate::proof::MerkleProofData;
use crate::tree::Node;

struct ForestEntry {
    size: usize,
    at: AccumulatedTree,
    frontier: Frontier,
    acc_at: G1Affine,
    acc_frontier: G1Affine,
    /// Bezout disjointness witnesses for this root: `g2^{X(s)}`, `g2^{Y(s)}`
    /// with `A(x)*X(x) + F(x)*Y(x) = 1` for this root's AT polynomial `A`
    /// and frontier polynomial `F`.
    bezout_x: G2Affine,
    bezout_y: G2Affine,
    merkle_hash: MerkleHash,
    history: Node<MergeHistoryData>,
}

/// The append-only authenticated dictionary.
pub struct Aad {
    lambda: usize,
    max_depth: usize,
    ctx: CryptoContext,
    trees: Vec<ForestEntry>,
    version: usize,
    digests: Vec<Digest>,
    next_index: u64,
    /// `label_identifier(hash_key(key))` -> every `(value, index)` appended
    /// under that key, in append order.
    values_by_key: HashMap<Vec<u8>, Vec<(Vec<u8>, u64)>>,
    /// Append order: the key appended at each leaf index.
    leaf_order: Vec<Vec<u8>>,
}

impl Aad {
    /// A fresh dictionary backed by real public parameters. `lambda` fixes
    /// both the security parameter and the AT depth (`4*lambda`); there is
    /// no default, per this crate's explicit-only plumbing of the security
    /// parameter. With the `SHA-256`-based hashing this crate uses, `128`
    /// is the only value under which `hash_key`/`hash_value`'s 256-bit
    /// outputs exactly fill the upper/lower halves of an AT path — other
    /// values are accepted but will panic on append once a path's actual
    /// bit length disagrees with `4*lambda`.
    pub fn new(lambda: usize, pp: Arc<PublicParameters>) -> Self {
        Self::with_context(lambda, CryptoContext::Real { pp })
    }

    /// A fresh dictionary in benchmarking-only simulate mode: no real
    /// commitments, no pairing checks.
    pub fn new_simulated(lambda: usize) -> Self {
        Self::with_context(lambda, CryptoContext::Simulated)
    }

    fn with_context(lambda: usize, ctx: CryptoContext) -> Self {
        Self {
            lambda,
            max_depth: 4 * lambda,
            ctx,
            trees: Vec::new(),
            version: 0,
            digests: vec![Digest::new()],
            next_index: 0,
            values_by_key: HashMap::new(),
            leaf_order: Vec::new(),
        }
    }

    /// The security parameter this dictionary was built with.
    pub fn lambda(&self) -> usize {
        self.lambda
    }

    /// The crypto context this dictionary was built with, needed by callers
    /// that verify proofs this instance produced.
    pub fn ctx(&self) -> &CryptoContext {
        &self.ctx
    }

    /// The current version number (number of appends so far).
    pub fn version(&self) -> usize {
        self.version
    }

    /// The digest as of `version` (or the current one, if `version` is
    /// `None`).
    pub fn get_digest(&self, version: Option<usize>) -> Result<&Digest> {
        let v = version.unwrap_or(self.version);
        self.digests.get(v).ok_or_else(|| {
            AadError::VersionOutOfRange { version: v, size: self.digests.len() }
        })
    }

    /// Appends one `(key, value)` pair, returning its 0-based leaf index.
    pub fn append(&mut self, key: &[u8], value: &[u8]) -> Result<u64> {
        let index = self.next_index;
        self.next_index += 1;
        self.version += 1;

        let key_hash = hash_key(key);
        let path = hashing::hash_key_value(key, value, index);
        let mut at = AccumulatedTree::new(self.max_depth);
        at.append(&path);

        let (upper_missing, lower_roots) = at.upper_frontier(self.lambda);
        let mut frontier = Frontier::new(self.lambda);
        for p in &upper_missing {
            frontier.add_missing_key_prefix(p);
        }
        let key_id = hashing::label_identifier(&key_hash);
        for lr in &lower_roots {
            let missing = at.lower_frontier(lr);
            frontier.add_missing_values_prefixes(&key_id, &missing);
        }
        frontier.finalize(&self.ctx)?;

        let acc_at = self.commit_at(&at)?;
        let acc_frontier = frontier.root_acc().ok_or_else(|| {
            AadError::ProtocolViolation("finalized frontier has no root accumulator".into())
        })?;
        let merkle_hash = MerkleHash::from_leaf_accumulator(&acc_at);
        let history = Node::new(
            BitString::empty(),
            MergeHistoryData { acc_at, subset_witness: None, version: self.version },
        );
        let (bezout_x, bezout_y) =
            self.bezout_witnesses(&at.characteristic_polynomial(), &frontier, acc_at, acc_frontier)?;

        let new_entry = ForestEntry {
            size: 1,
            at,
            frontier,
            acc_at,
            acc_frontier,
            bezout_x,
            bezout_y,
            merkle_hash,
            history,
        };
        self.trees.push(new_entry);
        self.cascade_merges()?;

        self.values_by_key
            .entry(key_id)
            .or_default()
            .push((value.to_vec(), index));
        self.leaf_order.push(key.to_vec());

        self.digests.push(self.snapshot_digest());
        Ok(index)
    }

    fn commit_at(&self, at: &AccumulatedTree) -> Result<G1Affine> {
        let poly = at.characteristic_polynomial();
        match &self.ctx {
            CryptoContext::Real { pp } => Ok(PolyCommit::commit_g1(pp, &poly, false)?.into_affine()),
            CryptoContext::Simulated => {
                use ark_ec::AffineRepr;
                Ok(G1Affine::identity())
            }
        }
    }

    /// Runs the extended Euclidean algorithm on this root's AT polynomial
    /// and its finalized frontier's polynomial, commits the resulting
    /// cofactors `X`/`Y` in G2, and asserts
    /// `e(acc_at, X) * e(acc_frontier, Y) = e(g1, g2)` before returning
    /// them. A failure here means the AT and frontier prefix sets were not
    /// actually disjoint — a forest invariant violation, not an
    /// adversarial-input condition, so it is fatal like every other
    /// construction-side error.
    fn bezout_witnesses(
        &self,
        at_poly: &crate::poly::Poly,
        frontier: &Frontier,
        acc_at: G1Affine,
        acc_frontier: G1Affine,
    ) -> Result<(G2Affine, G2Affine)> {
        match &self.ctx {
            CryptoContext::Real { pp } => {
                let frontier_poly = frontier.root_poly().ok_or_else(|| {
                    AadError::ProtocolViolation("finalized frontier has no root polynomial".into())
                })?;
                let (x, y) = crate::poly::extended_gcd_bezout(at_poly, frontier_poly)?;
                let bezout_x = PolyCommit::commit_g2(pp, &x)?.into_affine();
                let bezout_y = PolyCommit::commit_g2(pp, &y)?.into_affine();
                let lhs = pairing(acc_at, bezout_x) + pairing(acc_frontier, bezout_y);
                if lhs != pairing(g1_generator(), g2_generator()) {
                    return Err(AadError::ProtocolViolation(
                        "Bezout identity does not pair against this root's AT and frontier accumulators".into(),
                    ));
                }
                Ok((bezout_x, bezout_y))
            }
            CryptoContext::Simulated => {
                use ark_ec::AffineRepr;
                Ok((G2Affine::identity(), G2Affine::identity()))
            }
        }
    }

    fn cascade_merges(&mut self) -> Result<()> {
        loop {
            let n = self.trees.len();
            if n < 2 || self.trees[n - 2].size != self.trees[n - 1].size {
                break;
            }
            let b = self.trees.pop().expect("length checked above");
            let a = self.trees.pop().expect("length checked above");
            let merged = self.merge_entries(a, b)?;
            self.trees.push(merged);
        }
        Ok(())
    }

    fn merge_entries(&self, mut a: ForestEntry, b: ForestEntry) -> Result<ForestEntry> {
        let a_poly = a.at.characteristic_polynomial();
        let b_poly = b.at.characteristic_polynomial();
        a.at.merge(b.at)?;
        let merged_poly = a.at.characteristic_polynomial();

        let mut frontier = Frontier::new(self.lambda);
        let (upper_missing, lower_roots) = a.at.upper_frontier(self.lambda);
        for p in &upper_missing {
            frontier.add_missing_key_prefix(p);
        }
        for lr in &lower_roots {
            let missing = a.at.lower_frontier(lr);
            let key_id = hashing::label_identifier(lr);
            frontier.add_missing_values_prefixes(&key_id, &missing);
        }
        frontier.finalize(&self.ctx)?;

        let acc_at = self.commit_at(&a.at)?;
        let acc_frontier = frontier.root_acc().ok_or_else(|| {
            AadError::ProtocolViolation("finalized frontier has no root accumulator".into())
        })?;
        let merkle_hash = MerkleHash::combine(&acc_at, &a.merkle_hash, &b.merkle_hash);
        let (bezout_x, bezout_y) = self.bezout_witnesses(&merged_poly, &frontier, acc_at, acc_frontier)?;

        let mut left_history = a.history;
        let mut right_history = b.history;
        if let CryptoContext::Real { pp } = &self.ctx {
            let left_quot = crate::poly::divide_exact(&merged_poly, &a_poly)?;
            let right_quot = crate::poly::divide_exact(&merged_poly, &b_poly)?;
            left_history.data.subset_witness =
                Some(PolyCommit::commit_g2(pp, &left_quot)?.into_affine());
            right_history.data.subset_witness =
                Some(PolyCommit::commit_g2(pp, &right_quot)?.into_affine());
        }

        let mut history = Node::new(
            BitString::empty(),
            MergeHistoryData { acc_at, subset_witness: None, version: self.version },
        );
        history.left = Some(Box::new(left_history));
        history.right = Some(Box::new(right_history));

        Ok(ForestEntry {
            size: a.size + b.size,
            at: a.at,
            frontier,
            acc_at,
            acc_frontier,
            bezout_x,
            bezout_y,
            merkle_hash,
            history,
        })
    }

    fn snapshot_digest(&self) -> Digest {
        Digest {
            entries: self
                .trees
                .iter()
                .map(|t| DigestEntry {
                    acc_at: t.acc_at,
                    acc_frontier: t.acc_frontier,
                    bezout_x: t.bezout_x,
                    bezout_y: t.bezout_y,
                    merkle_hash: t.merkle_hash.clone(),
                })
                .collect(),
        }
    }

    /// Every value currently stored for `key`, oldest first.
    pub fn get_values(&self, key: &[u8]) -> Vec<(Vec<u8>, u64)> {
        let key_id = hashing::label_identifier(&hash_key(key));
        self.values_by_key.get(&key_id).cloned().unwrap_or_default()
    }

    /// The key appended at leaf index `i`, if any.
    pub fn get_key_by_leaf_no(&self, i: u64) -> Option<&[u8]> {
        self.leaf_order.get(i as usize).map(Vec::as_slice)
    }

    /// A complete membership (or non-membership) proof for `key` against
    /// *every* live forest tree, tagged with each tree's index (needed to
    /// look up that tree's `acc_at`/`acc_frontier` from a digest when
    /// verifying). A key's recorded values can live in more than one tree
    /// (e.g. appended before and after a merge cascade), so each tree gets
    /// its own proof built only from the values that tree's AT actually
    /// contains; a tree holding none of them gets a non-membership proof.
    pub fn complete_membership_proof(&self, key: &[u8]) -> Result<Vec<(usize, MembershipProof)>> {
        let key_hash = hash_key(key);
        let key_id = hashing::label_identifier(&key_hash);
        let all_values = self.values_by_key.get(&key_id).cloned().unwrap_or_default();

        if self.trees.is_empty() {
            return Err(AadError::ProtocolViolation("no forest tree to prove against".into()));
        }

        let mut proofs = Vec::with_capacity(self.trees.len());
        for (i, entry) in self.trees.iter().enumerate() {
            let tree_values: Vec<(Vec<u8>, u64)> = all_values
                .iter()
                .filter(|(value, index)| {
                    let path = hashing::hash_key_value(key, value, *index);
                    entry.at.contains(&path).0
                })
                .cloned()
                .collect();

            let proof = membership::build_membership_proof(
                &self.ctx,
                &entry.at,
                &entry.frontier,
                key,
                &key_id,
                &tree_values,
            )?;
            proofs.push((i, proof));
        }
        Ok(proofs)
    }

    /// An append-only proof that every tree recorded in the digest at
    /// `old_version` is still committed in the current forest.
    pub fn append_only_proof(&self, old_version: usize) -> Result<Vec<Node<MerkleProofData>>> {
        let old_digest = self.get_digest(Some(old_version))?;
        let mut proofs = Vec::with_capacity(old_digest.entries.len());
        for old_entry in &old_digest.entries {
            let mut found = None;
            for entry in &self.trees {
                if let Ok(p) = append_only::build_append_only_proof(&entry.history, old_entry.acc_at) {
                    found = Some(p);
                    break;
                }
            }
            let proof = found.ok_or_else(|| {
                AadError::ProtocolViolation(
                    "could not locate an old digest entry within the current forest".into(),
                )
            })?;
            proofs.push(proof);
        }
        Ok(proofs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_lookup_round_trip_in_simulate_mode() {
        let mut aad = Aad::new_simulated(128);
        aad.append(b"alice", b"1").expect("append succeeds");
        aad.append(b"bob", b"2").expect("append succeeds");
        assert_eq!(aad.get_values(b"alice"), vec![(b"1".to_vec(), 0)]);
        assert_eq!(aad.get_values(b"bob"), vec![(b"2".to_vec(), 1)]);
        assert_eq!(aad.version(), 2);
    }

    #[test]
    fn merge_cascade_collapses_two_single_trees() {
        let mut aad = Aad::new_simulated(128);
        aad.append(b"a", b"1").expect("append succeeds");
        assert_eq!(aad.trees.len(), 1);
        aad.append(b"b", b"2").expect("append succeeds");
        assert_eq!(aad.trees.len(), 1);
        assert_eq!(aad.trees[0].size, 2);
    }

    #[test]
    fn membership_proof_round_trips_for_a_present_key() {
        let mut aad = Aad::new_simulated(128);
        aad.append(b"alice", b"1").expect("append succeeds");
        let proofs = aad.complete_membership_proof(b"alice").expect("alice was appended");
        let digest = aad.get_digest(None).expect("current digest always exists");
        assert_eq!(proofs.len(), digest.entries.len());
        for (tree_idx, proof) in &proofs {
            let entry = &digest.entries[*tree_idx];
            assert!(membership::verify_membership_proof(
                proof,
                entry.acc_at,
                entry.acc_frontier,
                entry.bezout_x,
                entry.bezout_y,
                b"alice",
                aad.lambda(),
                &CryptoContext::Simulated,
            ));
        }
    }

    #[test]
    fn a_keys_values_spanning_two_trees_each_get_their_own_proof() {
        let mut aad = Aad::new_simulated(128);
        aad.append(b"k1", b"v1.1").expect("append succeeds");
        aad.append(b"k1", b"v1.2").expect("append succeeds");
        aad.append(b"k1", b"v1.3").expect("append succeeds");
        assert_eq!(aad.trees.iter().map(|t| t.size).collect::<Vec<_>>(), vec![2, 1]);

        let proofs = aad.complete_membership_proof(b"k1").expect("k1 was appended");
        assert_eq!(proofs.len(), 2);
        let total_values: usize = proofs
            .iter()
            .map(|(_, p)| match p {
                MembershipProof::Present { values, .. } => values.len(),
                MembershipProof::Absent { .. } => 0,
            })
            .sum();
        assert_eq!(total_values, 3);
    }
}
