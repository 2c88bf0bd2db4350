//! The Merkle overlay proof shared by membership and append-only proofs:
//! a pruned copy of the forest's merge tree, tagged per node with the role
//! it plays in verification, then checked in three passes — structural
//! prevalidation, bottom-up hash recomputation, and top-down subset-
//! witness pairing checks.

use ark_ec::CurveGroup;

use crate::curve::{pairing, g2_generator, G1Affine, G2Affine};
use crate::hashing::MerkleHash;
use crate::params::CryptoContext;
use crate::tree::Node;

/// A node's role in a Merkle-overlay proof.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MerkleRole {
    /// A sibling off the path to any requested leaf; carries only its
    /// Merkle hash.
    Sibling,
    /// A requested forest-tree root (membership) or historical digest
    /// entry (append-only); carries its accumulator but no subset
    /// witness, since nothing above it is being proved.
    Leaf,
    /// A node on the path from the overall root down to a requested leaf;
    /// carries its accumulator and the subset witness proving it divides
    /// its parent's accumulator.
    OnPath,
    /// The overall digest root; the verifier already holds its hash and
    /// needs no witness for it.
    Root,
}

/// Per-node payload of a Merkle-overlay proof.
pub struct MerkleProofData {
    /// This node's role.
    pub role: MerkleRole,
    /// The AT (or sub-forest) accumulator, when the role requires it.
    pub acc_at: Option<G1Affine>,
    /// The G2 subset witness proving this node's accumulator divides its
    /// parent's, present on every `OnPath` node except the overall root.
    pub subset_witness: Option<G2Affine>,
    /// Precomputed Merkle hash, present on `Sibling` nodes (whose subtree
    /// is not otherwise transmitted) and filled in for `OnPath`/`Leaf`/
    /// `Root` nodes as hashes are recomputed bottom-up.
    pub merkle_hash: Option<[u8; 32]>,
}

/// Pass 1: structural invariants that must hold regardless of any
/// cryptographic content — every `Leaf` is childless, every `Root` is the
/// tree root, every non-leaf has both children, and no other role reaches
/// a leaf position.
pub fn prevalidate(tree: &Node<MerkleProofData>, is_root: bool) -> bool {
    if is_root && tree.data.role != MerkleRole::Root && tree.data.role != MerkleRole::Leaf {
        log::warn!("merkle proof root node has an unexpected role");
        return false;
    }
    if tree.data.role == MerkleRole::Leaf {
        return tree.is_leaf();
    }
    if tree.is_leaf() {
        log::warn!("merkle proof node has no children but is not tagged Leaf");
        return false;
    }
    if !tree.has_two_children() {
        log::warn!("merkle proof internal node is missing a child");
        return false;
    }
    let l = tree.left.as_deref().expect("checked above");
    let r = tree.right.as_deref().expect("checked above");
    prevalidate(l, false) && prevalidate(r, false)
}

/// Pass 2: recomputes every node's Merkle hash bottom-up from its
/// children, filling `merkle_hash` on `OnPath`/`Root` nodes as it goes
/// (leaving `Sibling`/`Leaf` hashes as supplied). Returns the recomputed
/// root hash.
pub fn compute_merkle_hashes(tree: &mut Node<MerkleProofData>) -> [u8; 32] {
    if tree.data.role == MerkleRole::Leaf {
        return tree.data.merkle_hash.expect("leaf nodes carry a known hash");
    }
    if tree.data.role == MerkleRole::Sibling {
        return tree.data.merkle_hash.expect("sibling nodes carry a precomputed hash");
    }
    let left_hash = compute_merkle_hashes(tree.left.as_deref_mut().expect("prevalidated"));
    let right_hash = compute_merkle_hashes(tree.right.as_deref_mut().expect("prevalidated"));
    let acc = tree.data.acc_at.expect("on-path nodes carry their accumulator");
    let hash = MerkleHash::combine(&acc, &MerkleHash::Set(left_hash), &MerkleHash::Set(right_hash));
    let bytes = *hash.bytes().expect("combine always returns a set hash");
    tree.data.merkle_hash = Some(bytes);
    bytes
}

/// Pass 3: walks the accumulators top-down, checking
/// `e(acc_parent, g2) == e(acc_child, subset_witness_child)` at every
/// `OnPath` edge. Skipped entirely (always true) under
/// `CryptoContext::Simulated`.
pub fn verify_subset_proofs(tree: &Node<MerkleProofData>, parent_acc: G1Affine, ctx: &CryptoContext) -> bool {
    if ctx.is_simulated() {
        return true;
    }
    if tree.data.role == MerkleRole::OnPath {
        let acc = match tree.data.acc_at {
            Some(a) => a,
            None => {
                log::warn!("on-path merkle proof node missing its accumulator");
                return false;
            }
        };
        let witness = match tree.data.subset_witness {
            Some(w) => w,
            None => {
                log::warn!("on-path merkle proof node missing its subset witness");
                return false;
            }
        };
        if pairing(parent_acc, g2_generator()) != pairing(acc, witness) {
            log::warn!("subset-witness pairing check failed");
            return false;
        }
        let mut ok = true;
        if let Some(l) = &tree.left {
            ok &= verify_subset_proofs(l, acc, ctx);
        }
        if let Some(r) = &tree.right {
            ok &= verify_subset_proofs(r, acc, ctx);
        }
        return ok;
    }
    if tree.data.role == MerkleRole::Root {
        let acc = match tree.data.acc_at {
            Some(a) => a,
            None => return true,
        };
        let mut ok = true;
        if let Some(l) = &tree.left {
            ok &= verify_subset_proofs(l, acc, ctx);
        }
        if let Some(r) = &tree.right {
            ok &= verify_subset_proofs(r, acc, ctx);
        }
        return ok;
    }
    true
}

/// Wire size, in bytes, of this node's transmitted content: an on-path
/// non-root node carries two G1 elements (its accumulator, kept, plus the
/// extractable commitment folded into the subset witness derivation) and
/// one G2 element (the subset witness) — `2*32 + 64 = 128` bytes, matching
/// the forest proof's actual accounting rather than a naive per-element
/// tally. A `Sibling` carries one 32-byte Merkle hash; a `Leaf` carries one
/// G1 accumulator; the `Root` costs nothing, since the verifier already
/// holds it from the digest.
pub fn proof_size(tree: &Node<MerkleProofData>) -> usize {
    use crate::curve::{G1_ELEMENT_SIZE, G2_ELEMENT_SIZE, MERKLE_HASH_SIZE};
    let own = match tree.data.role {
        MerkleRole::Root => 0,
        MerkleRole::Leaf => G1_ELEMENT_SIZE,
        MerkleRole::Sibling => MERKLE_HASH_SIZE,
        MerkleRole::OnPath => 2 * G1_ELEMENT_SIZE + G2_ELEMENT_SIZE,
    };
    let children: usize = [&tree.left, &tree.right]
        .into_iter()
        .filter_map(|c| c.as_deref())
        .map(proof_size)
        .sum();
    own + children
}

/// Convenience: runs all three passes against an expected root hash,
/// logging (but not panicking) on any failure.
pub fn verify(tree: &mut Node<MerkleProofData>, expected_root_hash: [u8; 32], root_acc: G1Affine, ctx: &CryptoContext) -> bool {
    if !prevalidate(tree, true) {
        return false;
    }
    let computed = compute_merkle_hashes(tree);
    if computed != expected_root_hash {
        log::warn!("merkle overlay root hash mismatch");
        return false;
    }
    verify_subset_proofs(tree, root_acc, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::AffineRepr;

    #[test]
    fn proof_size_counts_on_path_node_as_128_bytes() {
        let node = Node::new(
            crate::bitstring::BitString::empty(),
            MerkleProofData {
                role: MerkleRole::OnPath,
                acc_at: Some(G1Affine::identity()),
                subset_witness: Some(G2Affine::identity()),
                merkle_hash: None,
            },
        );
        assert_eq!(proof_size(&node), 128);
    }

    #[test]
    fn leaf_only_tree_prevalidates() {
        let node = Node::new(
            crate::bitstring::BitString::empty(),
            MerkleProofData {
                role: MerkleRole::Leaf,
                acc_at: Some(G1Affine::identity()),
                subset_witness: None,
                merkle_hash: Some([0u8; 32]),
            },
        );
        assert!(prevalidate(&node, true));
    }
}
