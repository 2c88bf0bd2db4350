//! The frontier: a two-level authenticated tree over the prefixes *absent*
//! from an accumulated tree, used to prove an AT's completeness without
//! materializing every possible missing prefix.
//!
//! Construction happens in two phases (`spec.md` §4.2): seeding, where each
//! missing-key prefix and each key's lower-frontier chunk becomes one leaf
//! polynomial, and finalize, which reduces every seeded leaf into a single
//! tree and commits each node bottom-up.

use std::collections::HashMap;

use ark_ec::{AffineRepr, CurveGroup};

use crate::bitstring::BitString;
use crate::commit::PolyCommit;
use crate::curve::{pairing, g1_generator, g2_generator, G1Affine, G2Affine};
use crate::error::{AadError, Result};
use crate::hashing::hash_to_field;
use crate::params::CryptoContext;
use crate::poly::{self, Poly};
use crate::tree::{BinaryTree, Node};

/// Per-node frontier tree payload.
pub struct FrontierNodeData {
    /// The node's polynomial. Cleared after commitment except at the root,
    /// which keeps it for the Bezout (extended-GCD) step against the AT
    /// polynomial.
    pub poly: Option<Poly>,
    /// G1 commitment, always present once committed.
    pub acc1: Option<G1Affine>,
    /// Extractable G1 commitment, present on every non-leaf (including the
    /// root).
    pub acc1_ext: Option<G1Affine>,
    /// G2 commitment, present on every non-root non-leaf.
    pub acc2: Option<G2Affine>,
    /// True for leaves (seeded polynomial chunks); false for internal
    /// product-polynomial nodes.
    pub is_leaf: bool,
    /// For a leaf seeded from a key's lower-frontier chunk: that key's
    /// hash bytes. `None` for a leaf seeded from a single missing upper
    /// prefix.
    pub key_hash: Option<Vec<u8>>,
    /// For a leaf seeded from a single missing upper-frontier prefix: that
    /// prefix. Recorded so `proof_for_missing_prefix` can find this leaf's
    /// position in the merge tree without the caller needing to know it.
    pub missing_prefix: Option<BitString>,
}

struct PendingLeaf {
    key_hash: Option<Vec<u8>>,
    missing_prefix: Option<BitString>,
    poly: Poly,
}

/// The two-level authenticated tree over an AT's missing prefixes.
pub struct Frontier {
    lambda: usize,
    pending: Vec<PendingLeaf>,
    tree: Option<BinaryTree<FrontierNodeData>>,
    key_to_labels: HashMap<Vec<u8>, Vec<BitString>>,
    prefix_to_label: HashMap<BitString, BitString>,
}

impl Frontier {
    /// An empty, unfinalized frontier.
    pub fn new(lambda: usize) -> Self {
        Self {
            lambda,
            pending: Vec::new(),
            tree: None,
            key_to_labels: HashMap::new(),
            prefix_to_label: HashMap::new(),
        }
    }

    /// Seeds one leaf for a single missing upper-frontier prefix.
    pub fn add_missing_key_prefix(&mut self, prefix: &BitString) {
        let root = hash_to_field(prefix);
        self.pending.push(PendingLeaf {
            key_hash: None,
            missing_prefix: Some(prefix.clone()),
            poly: poly::from_roots(&[root]),
        });
    }

    /// Seeds one leaf per `4*lambda`-sized chunk of a key's lower-frontier
    /// prefixes.
    pub fn add_missing_values_prefixes(&mut self, key_hash: &[u8], prefixes: &[BitString]) {
        let chunk_size = 4 * self.lambda;
        for chunk in prefixes.chunks(chunk_size.max(1)) {
            let roots: Vec<_> = chunk.iter().map(hash_to_field).collect();
            self.pending.push(PendingLeaf {
                key_hash: Some(key_hash.to_vec()),
                missing_prefix: None,
                poly: poly::from_roots(&roots),
            });
        }
    }

    /// True once `finalize` has run.
    pub fn is_finalized(&self) -> bool {
        self.tree.is_some()
    }

    /// The root's polynomial, if finalized and not yet released (callers
    /// use this once, to run the extended Euclidean algorithm against the
    /// AT polynomial, then drop it).
    pub fn root_poly(&self) -> Option<&Poly> {
        self.tree
            .as_ref()
            .and_then(|t| t.root.as_ref())
            .and_then(|r| r.data.poly.as_ref())
    }

    /// The root's G1 accumulator, `acc_F` in the digest.
    pub fn root_acc(&self) -> Option<G1Affine> {
        self.tree.as_ref().and_then(|t| t.root.as_ref()).and_then(|r| r.data.acc1)
    }

    /// Reduces every seeded leaf into one tree (pairwise, back to front,
    /// regardless of size) and commits bottom-up: G1 always; extractable
    /// G1 on every non-leaf; G2 on every non-root non-leaf; the root keeps
    /// its polynomial instead of releasing it.
    pub fn finalize(&mut self, ctx: &CryptoContext) -> Result<()> {
        if self.pending.is_empty() {
            return Err(AadError::ProtocolViolation(
                "cannot finalize a frontier with no seeded leaves".into(),
            ));
        }
        let mut stack: Vec<Node<FrontierNodeData>> = self
            .pending
            .drain(..)
            .map(|p| {
                Node::new(
                    BitString::empty(),
                    FrontierNodeData {
                        poly: Some(p.poly),
                        acc1: None,
                        acc1_ext: None,
                        acc2: None,
                        is_leaf: true,
                        key_hash: p.key_hash,
                        missing_prefix: p.missing_prefix,
                    },
                )
            })
            .collect();

        while stack.len() > 1 {
            let b = stack.pop().expect("length checked above");
            let a = stack.pop().expect("length checked above");
            stack.push(merge_frontier_nodes(a, b));
        }
        let mut root = stack.pop().expect("pending was non-empty");
        assign_labels(&mut root, BitString::empty());

        let mut key_to_labels = HashMap::new();
        let mut prefix_to_label = HashMap::new();
        collect_key_labels(&root, &mut key_to_labels, &mut prefix_to_label);
        self.key_to_labels = key_to_labels;
        self.prefix_to_label = prefix_to_label;

        commit_tree(&mut root, ctx, true)?;
        self.tree = Some(BinaryTree { root: Some(Box::new(root)) });
        Ok(())
    }

    /// A frontier proof over the lower-frontier leaves recorded for `key_hash`.
    pub fn proof_for_key(&self, key_hash: &[u8]) -> Result<BinaryTree<FrontierProofData>> {
        let labels = self
            .key_to_labels
            .get(key_hash)
            .cloned()
            .unwrap_or_default();
        if labels.is_empty() {
            return Err(AadError::ProtocolViolation(
                "key has no lower-frontier leaves in this frontier".into(),
            ));
        }
        self.build_proof(&labels)
    }

    /// A frontier proof over the single leaf for a missing upper-frontier
    /// prefix.
    pub fn proof_for_missing_prefix(&self, prefix: &BitString) -> Result<BinaryTree<FrontierProofData>> {
        let label = self.prefix_to_label.get(prefix).cloned().ok_or_else(|| {
            AadError::ProtocolViolation("prefix has no leaf in this frontier".into())
        })?;
        self.build_proof(std::slice::from_ref(&label))
    }

    fn build_proof(&self, labels: &[BitString]) -> Result<BinaryTree<FrontierProofData>> {
        let src_root = self
            .tree
            .as_ref()
            .and_then(|t| t.root.as_deref())
            .ok_or_else(|| AadError::ProtocolViolation("frontier not finalized".into()))?;

        let mut dest = Node::new(
            BitString::empty(),
            RawProofNode {
                acc1: src_root.data.acc1,
                acc1_ext: src_root.data.acc1_ext,
                acc2: src_root.data.acc2,
                is_leaf: src_root.data.is_leaf,
                on_path: true,
                is_target_leaf: labels.iter().any(BitString::is_empty),
            },
        );
        for label in labels {
            if !label.is_empty() {
                copy_path_one(src_root, &mut dest, label, 0)?;
            }
        }
        Ok(BinaryTree { root: Some(Box::new(type_and_prune(&dest, true))) })
    }
}

fn merge_frontier_nodes(a: Node<FrontierNodeData>, b: Node<FrontierNodeData>) -> Node<FrontierNodeData> {
    let poly = poly::multiply(
        a.data.poly.as_ref().expect("unmerged node retains its polynomial"),
        b.data.poly.as_ref().expect("unmerged node retains its polynomial"),
    );
    let mut parent = Node::new(
        BitString::empty(),
        FrontierNodeData {
            poly: Some(poly),
            acc1: None,
            acc1_ext: None,
            acc2: None,
            is_leaf: false,
            key_hash: None,
            missing_prefix: None,
        },
    );
    parent.left = Some(Box::new(a));
    parent.right = Some(Box::new(b));
    parent
}

fn assign_labels(node: &mut Node<FrontierNodeData>, label: BitString) {
    node.label = label.clone();
    if let Some(l) = node.left.as_deref_mut() {
        let mut ll = label.clone();
        ll.push(false);
        assign_labels(l, ll);
    }
    if let Some(r) = node.right.as_deref_mut() {
        let mut rl = label.clone();
        rl.push(true);
        assign_labels(r, rl);
    }
}

fn collect_key_labels(
    node: &Node<FrontierNodeData>,
    key_map: &mut HashMap<Vec<u8>, Vec<BitString>>,
    prefix_map: &mut HashMap<BitString, BitString>,
) {
    if node.data.is_leaf {
        if let Some(k) = &node.data.key_hash {
            key_map.entry(k.clone()).or_default().push(node.label.clone());
        }
        if let Some(p) = &node.data.missing_prefix {
            prefix_map.insert(p.clone(), node.label.clone());
        }
    } else {
        if let Some(l) = &node.left {
            collect_key_labels(l, key_map, prefix_map);
        }
        if let Some(r) = &node.right {
            collect_key_labels(r, key_map, prefix_map);
        }
    }
}

/// Commits `node`'s polynomial bottom-up: G1 always; extractable G1 on
/// every non-leaf (including the root, per the reference's actual commit
/// logic — see `DESIGN.md` for why this differs from a literal reading of
/// `spec.md`'s prose); G2 on every non-root node, leaf or not, so that any
/// pair of siblings has at least one side able to supply the other's
/// cross-pairing check. Releases the polynomial afterward except at the
/// root.
fn commit_tree(node: &mut Node<FrontierNodeData>, ctx: &CryptoContext, is_root: bool) -> Result<()> {
    let is_leaf = node.data.is_leaf;
    if !is_leaf {
        if let Some(l) = node.left.as_deref_mut() {
            commit_tree(l, ctx, false)?;
        }
        if let Some(r) = node.right.as_deref_mut() {
            commit_tree(r, ctx, false)?;
        }
    }

    let poly = node
        .data
        .poly
        .clone()
        .ok_or_else(|| AadError::ProtocolViolation("missing polynomial to commit".into()))?;

    match ctx {
        CryptoContext::Real { pp } => {
            node.data.acc1 = Some(PolyCommit::commit_g1(pp, &poly, false)?.into_affine());
            if !is_leaf {
                node.data.acc1_ext = Some(PolyCommit::commit_g1(pp, &poly, true)?.into_affine());
            }
            if !is_root {
                node.data.acc2 = Some(PolyCommit::commit_g2(pp, &poly)?.into_affine());
            }
        }
        CryptoContext::Simulated => {
            node.data.acc1 = Some(G1Affine::identity());
            if !is_leaf {
                node.data.acc1_ext = Some(G1Affine::identity());
            }
            if !is_root {
                node.data.acc2 = Some(G2Affine::identity());
            }
        }
    }

    if !is_root {
        node.data.poly = None;
    }
    Ok(())
}

struct RawProofNode {
    acc1: Option<G1Affine>,
    acc1_ext: Option<G1Affine>,
    acc2: Option<G2Affine>,
    is_leaf: bool,
    on_path: bool,
    is_target_leaf: bool,
}

fn copy_path_one(
    src: &Node<FrontierNodeData>,
    dest: &mut Node<RawProofNode>,
    target: &BitString,
    depth: usize,
) -> Result<()> {
    if depth == target.len() {
        dest.data.on_path = true;
        dest.data.is_target_leaf = true;
        return Ok(());
    }
    dest.data.on_path = true;
    let bit = target.get(depth);
    for b in [false, true] {
        if dest.child(b).is_none() {
            let src_child = src.child(b).ok_or_else(|| {
                AadError::ProtocolViolation("source frontier tree missing expected child".into())
            })?;
            let mut child_label = dest.label.clone();
            child_label.push(b);
            let node = Node::new(
                child_label,
                RawProofNode {
                    acc1: src_child.data.acc1,
                    acc1_ext: src_child.data.acc1_ext,
                    acc2: src_child.data.acc2,
                    is_leaf: src_child.data.is_leaf,
                    on_path: false,
                    is_target_leaf: false,
                },
            );
            dest.set_child(b, Box::new(node));
        }
    }
    let src_on_path_child = src.child(bit).expect("bit came from a valid target path");
    let dest_on_path_child = dest.child_mut(bit).expect("just ensured present above");
    copy_path_one(src_on_path_child, dest_on_path_child, target, depth + 1)
}

/// Proof-node role, per `spec.md` §4.2's pruning table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FrontierRole {
    /// The frontier root; client already holds `acc_F` from the digest.
    Root,
    /// A requested leaf; the verifier reconstructs its polynomial from the
    /// expected frontier set rather than trusting a transmitted one.
    Leaf,
    /// A sibling that is itself a leaf: carries only its G1 commitment.
    SiblingLeaf,
    /// A sibling that is an internal node: carries only its G2 commitment.
    SiblingNonLeaf,
    /// A node on the path to a requested leaf.
    OnPath,
}

/// Pruned per-node proof payload.
pub struct FrontierProofData {
    /// This node's role.
    pub role: FrontierRole,
    /// G1 accumulator, when retained.
    pub acc1: Option<G1Affine>,
    /// Extractable G1 accumulator, when retained.
    pub acc1_ext: Option<G1Affine>,
    /// G2 accumulator, when retained.
    pub acc2: Option<G2Affine>,
}

fn type_and_prune(raw: &Node<RawProofNode>, is_root: bool) -> Node<FrontierProofData> {
    if is_root && raw.data.is_target_leaf && raw.left.is_none() && raw.right.is_none() {
        // The whole frontier is a single leaf; no merge structure to descend.
        return Node::new(raw.label.clone(), FrontierProofData { role: FrontierRole::Root, acc1: None, acc1_ext: None, acc2: None });
    }
    if !is_root && raw.data.is_target_leaf {
        return Node::new(raw.label.clone(), FrontierProofData { role: FrontierRole::Leaf, acc1: None, acc1_ext: None, acc2: None });
    }
    if !is_root && !raw.data.on_path {
        return if raw.data.is_leaf {
            Node::new(raw.label.clone(), FrontierProofData { role: FrontierRole::SiblingLeaf, acc1: raw.data.acc1, acc1_ext: None, acc2: raw.data.acc2 })
        } else {
            Node::new(raw.label.clone(), FrontierProofData { role: FrontierRole::SiblingNonLeaf, acc1: None, acc1_ext: None, acc2: raw.data.acc2 })
        };
    }

    let role = if is_root { FrontierRole::Root } else { FrontierRole::OnPath };
    let mut node = Node::new(
        raw.label.clone(),
        FrontierProofData { role, acc1: raw.data.acc1, acc1_ext: raw.data.acc1_ext, acc2: raw.data.acc2 },
    );
    if let Some(l) = &raw.left {
        node.left = Some(Box::new(type_and_prune(l, false)));
    }
    if let Some(r) = &raw.right {
        node.right = Some(Box::new(type_and_prune(r, false)));
    }

    // Exactly one side needs to carry G2 for the cross-pairing check in
    // section 4.2 to go through; prefer keeping the left one.
    let left_has_g2 = node.left.as_deref().map(carries_g2).unwrap_or(false);
    let right_has_g2 = node.right.as_deref().map(carries_g2).unwrap_or(false);
    if left_has_g2 && right_has_g2 {
        if let Some(r) = node.right.as_deref_mut() {
            if r.data.role == FrontierRole::OnPath {
                r.data.acc2 = None;
            }
        }
    }

    // A node's own extractable G1 is redundant once both children are
    // self-certifying: either a Leaf (trivially reconstructed) or already
    // carrying their own extractable G1.
    let self_certifying = |n: Option<&Node<FrontierProofData>>| {
        n.map(|n| n.data.role == FrontierRole::Leaf || n.data.acc1_ext.is_some()).unwrap_or(true)
    };
    if self_certifying(node.left.as_deref()) && self_certifying(node.right.as_deref()) {
        node.data.acc1_ext = None;
    }

    node
}

fn carries_g2(node: &Node<FrontierProofData>) -> bool {
    node.data.role == FrontierRole::SiblingNonLeaf || node.data.acc2.is_some()
}

/// Verifies a frontier proof against the digest's `acc_F` and the set of
/// field elements the verifier independently expects to be the frontier
/// (reconstructed either from the requested key's recorded lower-frontier
/// prefixes, or as a single non-membership prefix). `ctx` drives both leaf
/// recommitment and the internal pairing checks; under
/// `CryptoContext::Simulated` every check is skipped and only the proof's
/// shape (leaf count, coverage of `expected_roots`) is validated.
pub fn verify_frontier_proof(
    tree: &Node<FrontierProofData>,
    acc_f: G1Affine,
    expected_roots: &[crate::curve::Fr],
    lambda: usize,
    ctx: &CryptoContext,
) -> bool {
    let chunk_size = (4 * lambda).max(1);
    let mut leaf_labels = Vec::new();
    if tree.left.is_none() && tree.right.is_none() {
        // The whole frontier is a single leaf, tagged Root rather than Leaf.
        leaf_labels.push(tree.label.clone());
    } else {
        collect_leaf_labels(tree, &mut leaf_labels);
    }
    if leaf_labels.is_empty() {
        log::warn!("frontier proof has no leaves");
        return false;
    }
    let mut leaf_acc1 = Vec::with_capacity(leaf_labels.len());
    let mut rest = expected_roots;
    for _ in &leaf_labels {
        let take = chunk_size.min(rest.len());
        let (chunk, remainder) = rest.split_at(take);
        let poly = poly::from_roots(chunk);
        let acc1 = match ctx {
            CryptoContext::Real { pp } => match PolyCommit::commit_g1(pp, &poly, false) {
                Ok(acc) => acc.into_affine(),
                Err(e) => {
                    log::warn!("could not recommit expected frontier leaf: {e}");
                    return false;
                }
            },
            CryptoContext::Simulated => G1Affine::identity(),
        };
        leaf_acc1.push(acc1);
        rest = remainder;
    }
    if !rest.is_empty() {
        log::warn!("frontier proof leaves do not cover the expected frontier set");
        return false;
    }

    if tree.left.is_none() && tree.right.is_none() {
        // The whole frontier is a single leaf; there is no merge structure
        // to cross-check, only that `acc_f` is that leaf's commitment.
        return leaf_acc1.len() == 1 && leaf_acc1[0] == acc_f;
    }

    let mut next_leaf = 0usize;
    verify_node(tree, acc_f, &leaf_acc1, &mut next_leaf, ctx)
}

fn collect_leaf_labels(node: &Node<FrontierProofData>, out: &mut Vec<BitString>) {
    if node.data.role == FrontierRole::Leaf {
        out.push(node.label.clone());
    } else {
        if let Some(l) = &node.left {
            collect_leaf_labels(l, out);
        }
        if let Some(r) = &node.right {
            collect_leaf_labels(r, out);
        }
    }
}

fn verify_node(
    node: &Node<FrontierProofData>,
    acc1_from_parent: G1Affine,
    leaf_acc1: &[G1Affine],
    next_leaf: &mut usize,
    ctx: &CryptoContext,
) -> bool {
    let acc1 = match node.data.role {
        FrontierRole::Root => acc1_from_parent,
        FrontierRole::Leaf => {
            let Some(acc) = leaf_acc1.get(*next_leaf) else {
                log::warn!("ran out of reconstructed leaf commitments");
                return false;
            };
            *next_leaf += 1;
            *acc
        }
        _ => match node.data.acc1 {
            Some(acc) => acc,
            None => {
                log::warn!("frontier proof node missing its G1 commitment");
                return false;
            }
        },
    };

    if matches!(
        node.data.role,
        FrontierRole::Leaf | FrontierRole::SiblingLeaf | FrontierRole::SiblingNonLeaf
    ) {
        return true;
    }

    if let CryptoContext::Real { .. } = ctx {
        if let (Some(l), Some(r)) = (node.left.as_deref(), node.right.as_deref()) {
            let al = match effective_acc1(l, leaf_acc1, *next_leaf) {
                Some(a) => a,
                None => {
                    log::warn!("frontier left child has no usable G1 commitment");
                    return false;
                }
            };
            let skipped = leaves_before(l);
            let ar = match effective_acc1(r, leaf_acc1, next_leaf.saturating_add(skipped)) {
                Some(a) => a,
                None => {
                    log::warn!("frontier right child has no usable G1 commitment");
                    return false;
                }
            };
            let lhs = pairing(acc1, g2_generator());
            let cross = match (al, r.data.acc2, ar, l.data.acc2) {
                (al, Some(ar2), _, _) => pairing(al, ar2),
                (_, _, ar, Some(al2)) => pairing(ar, al2),
                _ => {
                    log::warn!("frontier internal node has no usable cross-pairing witness");
                    return false;
                }
            };
            if lhs != cross {
                log::warn!("frontier cross-pairing check failed");
                return false;
            }
            if node.data.role != FrontierRole::Root {
                if let Some(acc2_n) = node.data.acc2 {
                    if pairing(g1_generator(), acc2_n) != lhs {
                        log::warn!("frontier G1/G2 commitment mismatch");
                        return false;
                    }
                }
            }
        }
    }

    let mut ok = true;
    if let Some(l) = &node.left {
        ok &= verify_node(l, acc1, leaf_acc1, next_leaf, ctx);
    }
    if let Some(r) = &node.right {
        ok &= verify_node(r, acc1, leaf_acc1, next_leaf, ctx);
    }
    ok
}

/// The number of `Leaf`-role nodes under `node`, used to offset into
/// `leaf_acc1` when peeking at a not-yet-visited sibling's effective
/// commitment for the cross-pairing check.
fn leaves_before(node: &Node<FrontierProofData>) -> usize {
    let mut out = Vec::new();
    collect_leaf_labels(node, &mut out);
    out.len()
}

/// This node's G1 commitment, reconstructed from `leaf_acc1` when `node` is
/// a requested `Leaf` (whose commitment the prover never sends).
fn effective_acc1(node: &Node<FrontierProofData>, leaf_acc1: &[G1Affine], leaf_offset: usize) -> Option<G1Affine> {
    if node.data.role == FrontierRole::Leaf {
        leaf_acc1.get(leaf_offset).copied()
    } else {
        node.data.acc1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(bits: &[bool]) -> BitString {
        let mut bs = BitString::empty();
        for &b in bits {
            bs.push(b);
        }
        bs
    }

    #[test]
    fn finalize_rejects_an_empty_frontier() {
        let mut f = Frontier::new(2);
        assert!(f.finalize(&CryptoContext::Simulated).is_err());
    }

    #[test]
    fn single_missing_prefix_round_trips() {
        let mut f = Frontier::new(2);
        let missing = path(&[true]);
        f.add_missing_key_prefix(&missing);
        f.finalize(&CryptoContext::Simulated).expect("one seeded leaf");

        let acc_f = f.root_acc().expect("finalized frontier has a root accumulator");
        let proof = f.proof_for_missing_prefix(&missing).expect("missing prefix has a leaf");
        let roots = [hash_to_field(&missing)];
        assert!(verify_frontier_proof(proof.root.as_deref().expect("proof has a root"), acc_f, &roots, 2, &CryptoContext::Simulated));
    }

    #[test]
    fn wrong_expected_root_fails_verification() {
        use crate::params::PublicParameters;
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let (pp, _s, _tau) = PublicParameters::generate_insecure(&mut rng, 8);
        let ctx = CryptoContext::Real { pp: std::sync::Arc::new(pp) };

        let mut f = Frontier::new(2);
        let missing = path(&[true]);
        f.add_missing_key_prefix(&missing);
        f.finalize(&ctx).expect("one seeded leaf");

        let acc_f = f.root_acc().expect("finalized frontier has a root accumulator");
        let proof = f.proof_for_missing_prefix(&missing).expect("missing prefix has a leaf");
        let wrong_roots = [hash_to_field(&path(&[false]))];
        assert!(!verify_frontier_proof(proof.root.as_deref().expect("proof has a root"), acc_f, &wrong_roots, 2, &ctx));
    }

    #[test]
    fn key_lower_frontier_round_trips_through_proof_for_key() {
        let mut f = Frontier::new(1); // chunk size 4*lambda = 4
        let key_hash = vec![7u8];
        let missing = vec![path(&[true, false, false, true]), path(&[true, true, true, false])];
        f.add_missing_values_prefixes(&key_hash, &missing);
        f.add_missing_key_prefix(&path(&[false])); // an unrelated upper-frontier leaf
        f.finalize(&CryptoContext::Simulated).expect("two seeded leaves");

        let acc_f = f.root_acc().expect("finalized frontier has a root accumulator");
        let proof = f.proof_for_key(&key_hash).expect("key has a lower-frontier leaf");
        let roots: Vec<_> = missing.iter().map(hash_to_field).collect();
        assert!(verify_frontier_proof(proof.root.as_deref().expect("proof has a root"), acc_f, &roots, 1, &CryptoContext::Simulated));
    }

    #[test]
    fn proof_for_unknown_key_is_an_error() {
        let mut f = Frontier::new(2);
        f.add_missing_key_prefix(&path(&[true]));
        f.finalize(&CryptoContext::Simulated).expect("one seeded leaf");
        assert!(f.proof_for_key(b"nobody").is_err());
    }

    #[test]
    fn real_context_round_trips_two_leaves() {
        use crate::params::PublicParameters;
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let (pp, _s, _tau) = PublicParameters::generate_insecure(&mut rng, 8);
        let ctx = CryptoContext::Real { pp: std::sync::Arc::new(pp) };

        let mut f = Frontier::new(2);
        let a = path(&[false, false]);
        let b = path(&[true, true]);
        f.add_missing_key_prefix(&a);
        f.add_missing_key_prefix(&b);
        f.finalize(&ctx).expect("two seeded leaves");

        let acc_f = f.root_acc().expect("finalized frontier has a root accumulator");
        let proof = f.proof_for_missing_prefix(&a).expect("a has a leaf");
        let roots = [hash_to_field(&a)];
        assert!(verify_frontier_proof(proof.root.as_deref().expect("proof has a root"), acc_f, &roots, 2, &ctx));
        assert!(!verify_frontier_proof(proof.root.as_deref().expect("proof has a root"), acc_f, &[hash_to_field(&b)], 2, &ctx));
    }
}
