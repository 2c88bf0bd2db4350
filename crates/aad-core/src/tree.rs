//! Generic owned binary tree and forest primitives shared by accumulated
//! trees, the frontier, and the append-only forest of trees.
//!
//! Node ownership follows `spec.md` §9's "prefer composition" note: a node
//! is `{ children[2], payload }`, with no parent back-reference. Algorithms
//! that the reference implementation expresses by walking up from a leaf to
//! its root via a parent pointer are instead expressed here top-down, from
//! the root down to a target label — the two are equivalent for a
//! single-writer tree and this avoids weak/raw parent pointers entirely.

use crate::bitstring::BitString;

/// An owned tree node labeled by its root-to-node path.
pub struct Node<T> {
    /// Path from the tree root to this node (0 = left, 1 = right).
    pub label: BitString,
    /// Node payload.
    pub data: T,
    /// Left child (bit `false`).
    pub left: Option<Box<Node<T>>>,
    /// Right child (bit `true`).
    pub right: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    /// Builds a childless node.
    pub fn new(label: BitString, data: T) -> Self {
        Self {
            label,
            data,
            left: None,
            right: None,
        }
    }

    /// True if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// True if both children are present.
    pub fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Child by bit (`false` = left, `true` = right).
    pub fn child(&self, bit: bool) -> Option<&Node<T>> {
        if bit {
            self.right.as_deref()
        } else {
            self.left.as_deref()
        }
    }

    /// Mutable child by bit.
    pub fn child_mut(&mut self, bit: bool) -> Option<&mut Node<T>> {
        if bit {
            self.right.as_deref_mut()
        } else {
            self.left.as_deref_mut()
        }
    }

    /// Replaces the child on the given side.
    pub fn set_child(&mut self, bit: bool, node: Box<Node<T>>) {
        if bit {
            self.right = Some(node);
        } else {
            self.left = Some(node);
        }
    }

    /// Removes and returns the child on the given side.
    pub fn take_child(&mut self, bit: bool) -> Option<Box<Node<T>>> {
        if bit {
            self.right.take()
        } else {
            self.left.take()
        }
    }
}

/// An owned binary tree.
pub struct BinaryTree<T> {
    /// The root, if any append has happened yet.
    pub root: Option<Box<Node<T>>>,
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<T> BinaryTree<T> {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the root if absent, then walks `path` bit by bit, creating
    /// children as needed, with each new node's payload produced by
    /// `make(label)`. Idempotent: re-appending the same path creates no new
    /// nodes.
    pub fn append_path(&mut self, path: &BitString, make: &impl Fn(&BitString) -> T) {
        if self.root.is_none() {
            self.root = Some(Box::new(Node::new(BitString::empty(), make(&BitString::empty()))));
        }
        let mut cur = self.root.as_mut().expect("root was just ensured present");
        let mut label = BitString::empty();
        for i in 0..path.len() {
            let bit = path.get(i);
            label.push(bit);
            if cur.child(bit).is_none() {
                let node = Box::new(Node::new(label.clone(), make(&label)));
                cur.set_child(bit, node);
            }
            cur = cur.child_mut(bit).expect("child was just ensured present");
        }
    }

    /// Pre-order traversal: every node, root first, including the root
    /// itself.
    pub fn preorder(&self) -> Vec<&Node<T>> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            Self::preorder_helper(root, &mut out);
        }
        out
    }

    fn preorder_helper<'a>(node: &'a Node<T>, out: &mut Vec<&'a Node<T>>) {
        out.push(node);
        if let Some(l) = &node.left {
            Self::preorder_helper(l, out);
        }
        if let Some(r) = &node.right {
            Self::preorder_helper(r, out);
        }
    }

    /// Walks down `target` bit by bit. Returns `(true, Some(node), None)`
    /// if the full path exists, or `(false, None, Some(missing_label))`
    /// with the label of the first missing child otherwise.
    pub fn find(&self, target: &BitString) -> (bool, Option<&Node<T>>, Option<BitString>) {
        let mut cur = match &self.root {
            Some(r) => r.as_ref(),
            None => return (false, None, Some(BitString::empty())),
        };
        let mut label = BitString::empty();
        for i in 0..target.len() {
            let bit = target.get(i);
            match cur.child(bit) {
                Some(c) => {
                    cur = c;
                    label.push(bit);
                }
                None => {
                    label.push(bit);
                    return (false, None, Some(label));
                }
            }
        }
        (true, Some(cur), None)
    }
}

/// Structurally re-parents `src`'s children into `dest`: for each side, if
/// `dest` lacks the child but `src` has it, the child is moved over intact;
/// if both have it, the merge recurses.
pub fn merge_nodes<T>(dest: &mut Node<T>, src: Box<Node<T>>) {
    let Node { left, right, .. } = *src;
    for (bit, src_child) in [(false, left), (true, right)] {
        if let Some(src_child) = src_child {
            match dest.take_child(bit) {
                None => dest.set_child(bit, src_child),
                Some(mut dest_child) => {
                    merge_nodes(&mut dest_child, src_child);
                    dest.set_child(bit, dest_child);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_path_is_idempotent() {
        let mut tree = BinaryTree::new();
        let mut path = BitString::empty();
        path.push(true);
        path.push(false);
        tree.append_path(&path, &|_| ());
        let count_before = tree.preorder().len();
        tree.append_path(&path, &|_| ());
        assert_eq!(tree.preorder().len(), count_before);
    }

    #[test]
    fn preorder_includes_empty_root() {
        let mut tree = BinaryTree::new();
        let mut path = BitString::empty();
        path.push(false);
        tree.append_path(&path, &|_| ());
        let nodes = tree.preorder();
        assert!(nodes.iter().any(|n| n.label.is_empty()));
    }
}
