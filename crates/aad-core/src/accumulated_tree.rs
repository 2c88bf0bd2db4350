//! The accumulated tree (AT): a fixed-depth prefix-trie over appended
//! 512-bit `(key, value, index)` hashes, whose characteristic polynomial
//! (over every prefix, including the empty root) is committed as a single
//! polynomial-commitment accumulator.

use crate::bitstring::BitString;
use crate::error::{AadError, Result};
use crate::tree::{merge_nodes, BinaryTree};

/// A prefix-trie of fixed `max_depth` bits.
pub struct AccumulatedTree {
    tree: BinaryTree<()>,
    max_depth: usize,
}

impl AccumulatedTree {
    /// An empty AT of the given max depth (`4*lambda` per `spec.md` §3).
    pub fn new(max_depth: usize) -> Self {
        Self {
            tree: BinaryTree::new(),
            max_depth,
        }
    }

    /// Max depth this AT was built with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Materializes every prefix of `path` as a node. Idempotent. `path`
    /// must be exactly `max_depth` bits.
    pub fn append(&mut self, path: &BitString) {
        debug_assert_eq!(path.len(), self.max_depth);
        self.tree.append_path(path, &|_| ());
    }

    /// Every node's label, including the empty root: the roots of the AT's
    /// characteristic polynomial (as field elements, via `hashToField`).
    pub fn prefixes(&self) -> Vec<BitString> {
        self.tree.preorder().into_iter().map(|n| n.label.clone()).collect()
    }

    /// The AT's characteristic polynomial: `prod (x - hashToField(p))` over
    /// every materialized prefix, including the empty root.
    pub fn characteristic_polynomial(&self) -> crate::poly::Poly {
        let roots: Vec<_> = self.prefixes().iter().map(crate::hashing::hash_to_field).collect();
        crate::poly::from_roots(&roots)
    }

    /// `(found, missing_prefix)`: walks down `h`; `missing_prefix` is the
    /// label of the first missing child when `h` is not contained, used as
    /// the non-membership witness in a frontier proof.
    pub fn contains(&self, h: &BitString) -> (bool, Option<BitString>) {
        let (found, _node, missing) = self.tree.find(h);
        (found, missing)
    }

    /// Re-parents `other`'s nodes into `self` (AT.merge, `spec.md` §4.1).
    /// Errors if the two ATs were built with different max depths.
    pub fn merge(&mut self, other: AccumulatedTree) -> Result<()> {
        if self.max_depth != other.max_depth {
            return Err(AadError::ProtocolViolation(
                "cannot merge accumulated trees of different max depth".into(),
            ));
        }
        match (self.tree.root.as_mut(), other.tree.root) {
            (None, src_root) => self.tree.root = src_root,
            (Some(_), None) => {}
            (Some(dest_root), Some(src_root)) => merge_nodes(dest_root, src_root),
        }
        Ok(())
    }

    /// The upper frontier (missing labels at depth `<= 2*lambda`) plus the
    /// labels of the lower-tree roots: nodes that exist at exactly depth
    /// `2*lambda`, each the root of one key's lower-frontier subtree.
    pub fn upper_frontier(&self, lambda: usize) -> (Vec<BitString>, Vec<BitString>) {
        let mut frontier = Vec::new();
        let mut lower_roots = Vec::new();
        match &self.tree.root {
            Some(root) => {
                Self::frontier_walk(root, &BitString::empty(), 2 * lambda, true, &mut frontier, &mut lower_roots);
            }
            None => frontier.push(BitString::empty()),
        }
        (frontier, lower_roots)
    }

    /// The lower frontier within the subtree rooted at `lower_root_label`
    /// (a label returned by `upper_frontier`, at depth `2*lambda`).
    pub fn lower_frontier(&self, lower_root_label: &BitString) -> Vec<BitString> {
        let (found, node, _) = self.tree.find(lower_root_label);
        let mut frontier = Vec::new();
        if let (true, Some(node)) = (found, node) {
            let remaining = self.max_depth.saturating_sub(lower_root_label.len());
            let mut unused = Vec::new();
            Self::frontier_walk(node, lower_root_label, remaining, false, &mut frontier, &mut unused);
        }
        frontier
    }

    fn frontier_walk(
        node: &crate::tree::Node<()>,
        label: &BitString,
        levels_left: usize,
        include_lower_roots: bool,
        frontier: &mut Vec<BitString>,
        lower_roots: &mut Vec<BitString>,
    ) {
        if include_lower_roots && levels_left == 0 {
            lower_roots.push(label.clone());
            return;
        }
        if levels_left == 0 {
            return;
        }
        for bit in [false, true] {
            let mut child_label = label.clone();
            child_label.push(bit);
            match node.child(bit) {
                Some(child) => Self::frontier_walk(
                    child,
                    &child_label,
                    levels_left - 1,
                    include_lower_roots,
                    frontier,
                    lower_roots,
                ),
                None => frontier.push(child_label),
            }
        }
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
    fn append_materializes_every_prefix_including_root() {
        let mut at = AccumulatedTree::new(3);
        at.append(&path(&[true, false, true]));
        let prefixes = at.prefixes();
        assert_eq!(prefixes.len(), 4); // empty root + 3 prefixes
        assert!(prefixes.iter().any(BitString::is_empty));
    }

    #[test]
    fn contains_reports_missing_prefix() {
        let mut at = AccumulatedTree::new(2);
        at.append(&path(&[true, true]));
        let (found, missing) = at.contains(&path(&[false, false]));
        assert!(!found);
        assert_eq!(missing.expect("contains reported not-found but no missing prefix"), path(&[false]));
    }

    #[test]
    fn merge_combines_both_tries() {
        let mut a = AccumulatedTree::new(2);
        a.append(&path(&[false, false]));
        let mut b = AccumulatedTree::new(2);
        b.append(&path(&[true, true]));
        a.merge(b).expect("merge of equal-depth trees");
        assert!(a.contains(&path(&[false, false])).0);
        assert!(a.contains(&path(&[true, true])).0);
    }

    #[test]
    fn upper_frontier_collects_missing_siblings() {
        let mut at = AccumulatedTree::new(4);
        at.append(&path(&[false, false, false, false]));
        let (frontier, lower_roots) = at.upper_frontier(1); // 2*lambda = 2
        assert!(frontier.contains(&path(&[true])));
        assert!(lower_roots.contains(&path(&[false, false])));
    }
}
