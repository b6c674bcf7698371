//! Arena syntax trees.
//!
//! A parse tree is stored as a flat arena of nodes addressed by stable
//! [`NodeId`] indices. Each node carries a parent index (navigation only,
//! never ownership) and an ordered child list; the payload is either an
//! internal label or a terminal leaf text. This sidesteps the aliasing
//! hazards of live parent back-pointers while the rewrite engine mutates a
//! tree in place: detaching a subtree just rewires index lists, and ids are
//! never invalidated. Subtrees dropped by a rewrite stay in the arena,
//! unreachable from the root.
//!
//! Shape conventions, matching what the chart parser produces:
//!
//! ```text
//! (S (NP (PRP I)) (VP (VB go) ...))
//!         ^^^^^^ preterminal: internal node whose sole child is a leaf;
//!                its label is the POS tag of the word below it
//! ```
//!
//! Leaves read left to right are the surface sentence.

use crate::grammar::Signature;
use std::fmt;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
enum Payload {
    Internal { label: String },
    Leaf { text: String },
}

#[derive(Debug, Clone)]
struct TreeNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    payload: Payload,
}

/// A parse tree over an arena of nodes.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl SyntaxTree {
    /// Create a tree holding a single internal root node.
    pub fn new(root_label: impl Into<String>) -> Self {
        let root = TreeNode {
            parent: None,
            children: Vec::new(),
            payload: Payload::Internal { label: root_label.into() },
        };
        SyntaxTree { nodes: vec![root], root: 0 }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].payload {
            Payload::Internal { label } => Some(label),
            Payload::Leaf { .. } => None,
        }
    }

    pub fn leaf_text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].payload {
            Payload::Leaf { text } => Some(text),
            Payload::Internal { .. } => None,
        }
    }

    pub fn is_internal(&self, id: NodeId) -> bool {
        matches!(self.nodes[id].payload, Payload::Internal { .. })
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when `id` is reachable from the root via parent links.
    pub fn is_attached(&self, mut id: NodeId) -> bool {
        loop {
            if id == self.root {
                return true;
            }
            match self.nodes[id].parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Append a fresh internal node under `parent`.
    pub fn add_internal(&mut self, parent: NodeId, label: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            parent: Some(parent),
            children: Vec::new(),
            payload: Payload::Internal { label: label.into() },
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Append a fresh leaf under `parent`.
    pub fn add_leaf(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            parent: Some(parent),
            children: Vec::new(),
            payload: Payload::Leaf { text: text.into() },
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Create a detached preterminal `tag` over a single leaf `word`.
    ///
    /// Used by the rewrite engine for inserted target symbols; the caller
    /// attaches the returned node via [`SyntaxTree::replace_children`].
    pub fn add_detached_preterminal(&mut self, tag: &str, word: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            parent: None,
            children: Vec::new(),
            payload: Payload::Internal { label: tag.to_string() },
        });
        let leaf = self.nodes.len();
        self.nodes.push(TreeNode {
            parent: Some(id),
            children: Vec::new(),
            payload: Payload::Leaf { text: word.to_string() },
        });
        self.nodes[id].children.push(leaf);
        id
    }

    /// Replace `parent`'s child list. Old children are detached first, then
    /// the new list is attached in order; a child may appear in both.
    pub fn replace_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        let old = std::mem::take(&mut self.nodes[parent].children);
        for id in old {
            self.nodes[id].parent = None;
        }
        for &id in &children {
            self.nodes[id].parent = Some(parent);
        }
        self.nodes[parent].children = children;
    }

    fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            for &child in self.nodes[id].children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Internal nodes in depth-first pre-order.
    pub fn internal_nodes(&self) -> Vec<NodeId> {
        self.preorder().into_iter().filter(|&id| self.is_internal(id)).collect()
    }

    /// Leaf texts, left to right — the surface sentence.
    pub fn leaves(&self) -> Vec<&str> {
        self.preorder().into_iter().filter_map(|id| self.leaf_text(id)).collect()
    }

    /// `(word, tag)` pairs, left to right. The tag is the label directly
    /// above each leaf.
    pub fn tagged_leaves(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        for id in self.preorder() {
            let Payload::Leaf { text } = &self.nodes[id].payload else { continue };
            let Some(parent) = self.nodes[id].parent else { continue };
            if let Payload::Internal { label } = &self.nodes[parent].payload {
                out.push((text.as_str(), label.as_str()));
            }
        }
        out
    }

    /// Internal nodes whose sole child is a leaf (depth-2 nodes), in
    /// left-to-right order.
    pub fn preterminals(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| {
                let children = self.children(id);
                self.is_internal(id)
                    && children.len() == 1
                    && children.first().is_some_and(|&c| !self.is_internal(c))
            })
            .collect()
    }

    /// Local rule signature of `parent`: its label over the labels of its
    /// children, defined only when every child is an internal node.
    ///
    /// This is the per-parent view of the left-most-child signature: a
    /// left-most child's signature covers its own label plus all its right
    /// siblings, which is exactly the parent's full child list.
    pub fn local_signature(&self, parent: NodeId) -> Option<Signature> {
        let Payload::Internal { label } = &self.nodes[parent].payload else { return None };
        let children = &self.nodes[parent].children;
        if children.is_empty() {
            return None;
        }
        let mut rhs = Vec::with_capacity(children.len());
        for &child in children {
            match &self.nodes[child].payload {
                Payload::Internal { label } => rhs.push(label.clone()),
                Payload::Leaf { .. } => return None,
            }
        }
        Some(Signature::new(label.clone(), rhs))
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        match &self.nodes[id].payload {
            Payload::Leaf { text } => write!(f, "{text}"),
            Payload::Internal { label } => {
                write!(f, "({label}")?;
                for &child in &self.nodes[id].children {
                    write!(f, " ")?;
                    self.fmt_node(f, child)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for SyntaxTree {
    /// Bracketed form, e.g. `(S (NP (PRP I)))`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (S (NP (PRP I)) (VP (VB go)))
    fn sample() -> SyntaxTree {
        let mut tree = SyntaxTree::new("S");
        let np = tree.add_internal(tree.root(), "NP");
        let prp = tree.add_internal(np, "PRP");
        tree.add_leaf(prp, "I");
        let vp = tree.add_internal(tree.root(), "VP");
        let vb = tree.add_internal(vp, "VB");
        tree.add_leaf(vb, "go");
        tree
    }

    #[test]
    fn leaves_read_left_to_right() {
        assert_eq!(sample().leaves(), vec!["I", "go"]);
    }

    #[test]
    fn tagged_leaves_use_the_label_above() {
        assert_eq!(sample().tagged_leaves(), vec![("I", "PRP"), ("go", "VB")]);
    }

    #[test]
    fn preterminals_are_depth_2_nodes() {
        let tree = sample();
        let tags: Vec<&str> =
            tree.preterminals().into_iter().filter_map(|id| tree.label(id)).collect();
        assert_eq!(tags, vec!["PRP", "VB"]);
    }

    #[test]
    fn local_signature_covers_all_children() {
        let tree = sample();
        let sig = tree.local_signature(tree.root()).unwrap();
        assert_eq!(sig.key(), "S -> NP VP");
    }

    #[test]
    fn no_signature_at_or_below_preterminals() {
        let tree = sample();
        for id in tree.preterminals() {
            assert!(tree.local_signature(id).is_none());
        }
    }

    #[test]
    fn replace_children_reorders_and_detaches() {
        let mut tree = SyntaxTree::new("P");
        let a = tree.add_internal(tree.root(), "A");
        tree.add_leaf(a, "a");
        let b = tree.add_internal(tree.root(), "B");
        tree.add_leaf(b, "b");

        tree.replace_children(tree.root(), vec![b, a]);
        assert_eq!(tree.leaves(), vec!["b", "a"]);
        assert_eq!(tree.parent(a), Some(tree.root()));

        tree.replace_children(tree.root(), vec![b]);
        assert_eq!(tree.leaves(), vec!["b"]);
        assert_eq!(tree.parent(a), None);
        assert!(!tree.is_attached(a));
        assert!(tree.is_attached(b));
    }

    #[test]
    fn display_is_bracketed() {
        assert_eq!(sample().to_string(), "(S (NP (PRP I)) (VP (VB go)))");
    }
}
