//! Prefix tree of combos.
//!
//! Each edge is one [`Combo`]; a path from the root spells out a
//! [`Sequence`](crate::Sequence). A node that ends a registered sequence
//! carries its callback. Every node is owned by its parent's child map, so
//! the tree is strictly hierarchical.
//!
//! Invariant: apart from the root, no node is both childless and without a
//! callback. [`TrieNode::remove`] prunes such nodes on the way back up.

use std::collections::HashMap;

use crate::combo::Combo;

/// A node in the combo trie.
#[derive(Debug, Clone)]
pub struct TrieNode<T> {
    children: HashMap<Combo, TrieNode<T>>,
    callback: Option<T>,
}

impl<T> TrieNode<T> {
    /// Create an empty node.
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            callback: None,
        }
    }

    /// Bind `callback` at the end of `path`, creating intermediate nodes.
    ///
    /// Returns the callback previously bound to exactly this path; the last
    /// registration wins. An empty path is ignored and hands the callback
    /// back.
    pub fn insert(&mut self, path: &[Combo], callback: T) -> Option<T> {
        if path.is_empty() {
            return Some(callback);
        }

        let mut node = self;
        for combo in path {
            node = node.children.entry(combo.clone()).or_default();
        }
        node.callback.replace(callback)
    }

    /// Unbind the callback at the end of `path`.
    ///
    /// A path that does not fully exist, or ends at a node without a
    /// callback, is left untouched. Otherwise the callback is removed, and
    /// every node on the path that is left with neither children nor a
    /// callback is pruned, stopping at the first node still in use.
    pub fn remove(&mut self, path: &[Combo]) -> Option<T> {
        let (first, rest) = path.split_first()?;
        let child = self.children.get_mut(first)?;

        let removed = if rest.is_empty() {
            child.callback.take()?
        } else {
            child.remove(rest)?
        };

        if child.is_empty() {
            self.children.remove(first);
        }
        Some(removed)
    }

    /// The child reached through `combo`, if any.
    pub fn lookup(&self, combo: &Combo) -> Option<&TrieNode<T>> {
        self.children.get(combo)
    }

    /// The node at the end of `path`, if the whole path exists.
    pub fn descend(&self, path: &[Combo]) -> Option<&TrieNode<T>> {
        path.iter().try_fold(self, |node, combo| node.lookup(combo))
    }

    /// The bound callback, if this node ends a registered sequence.
    pub fn callback(&self) -> Option<&T> {
        self.callback.as_ref()
    }

    /// Whether this node ends a registered sequence.
    pub fn is_terminal(&self) -> bool {
        self.callback.is_some()
    }

    /// Number of outgoing edges.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether nothing at all is registered below this node.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.callback.is_none()
    }
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::Sequence;

    fn path(spec: &str) -> Vec<Combo> {
        Sequence::parse(spec).combos().to_vec()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut root = TrieNode::new();
        root.insert(&path("Ctrl+K Ctrl+S"), "save");

        let first = root.lookup(&Combo::parse("K+control")).unwrap();
        assert!(!first.is_terminal());
        let second = first.lookup(&Combo::parse("ctrl+S")).unwrap();
        assert_eq!(second.callback(), Some(&"save"));
        assert!(root.lookup(&Combo::parse("ctrl+S")).is_none());
    }

    #[test]
    fn test_last_insert_wins() {
        let mut root = TrieNode::new();
        assert_eq!(root.insert(&path("g g"), "first"), None);
        assert_eq!(root.insert(&path("g g"), "second"), Some("first"));
        assert_eq!(root.descend(&path("g g")).unwrap().callback(), Some(&"second"));
    }

    #[test]
    fn test_remove_round_trip() {
        let mut root = TrieNode::new();
        root.insert(&path("Ctrl+K Ctrl+S"), 1);

        assert_eq!(root.remove(&path("Ctrl+K Ctrl+S")), Some(1));
        assert!(root.is_empty());
    }

    #[test]
    fn test_remove_keeps_shared_prefix() {
        let mut root = TrieNode::new();
        root.insert(&path("Ctrl+K Ctrl+S"), "save");
        root.insert(&path("Ctrl+K Ctrl+A"), "all");

        assert_eq!(root.remove(&path("Ctrl+K Ctrl+S")), Some("save"));

        let prefix = root.descend(&path("Ctrl+K")).unwrap();
        assert_eq!(prefix.child_count(), 1);
        assert!(root.descend(&path("Ctrl+K Ctrl+S")).is_none());
        assert_eq!(
            root.descend(&path("Ctrl+K Ctrl+A")).unwrap().callback(),
            Some(&"all")
        );
    }

    #[test]
    fn test_remove_terminal_with_children_keeps_node() {
        let mut root = TrieNode::new();
        root.insert(&path("g"), "g");
        root.insert(&path("g g"), "gg");

        assert_eq!(root.remove(&path("g")), Some("g"));

        let g = root.descend(&path("g")).unwrap();
        assert!(!g.is_terminal());
        assert_eq!(g.child_count(), 1);
    }

    #[test]
    fn test_pruning_stops_at_terminal_ancestor() {
        let mut root = TrieNode::new();
        root.insert(&path("g"), "g");
        root.insert(&path("g g"), "gg");

        assert_eq!(root.remove(&path("g g")), Some("gg"));

        let g = root.descend(&path("g")).unwrap();
        assert_eq!(g.callback(), Some(&"g"));
        assert_eq!(g.child_count(), 0);
    }

    #[test]
    fn test_remove_missing_path_is_noop() {
        let mut root = TrieNode::new();
        root.insert(&path("Ctrl+K Ctrl+S"), "save");

        assert_eq!(root.remove(&path("Ctrl+X")), None);
        assert_eq!(root.remove(&path("Ctrl+K Ctrl+S Ctrl+Q")), None);
        // A prefix that was never registered on its own.
        assert_eq!(root.remove(&path("Ctrl+K")), None);
        assert!(root.descend(&path("Ctrl+K Ctrl+S")).is_some());
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut root = TrieNode::new();
        root.insert(&path("Esc"), ());
        assert_eq!(root.remove(&path("Esc")), Some(()));
        assert_eq!(root.remove(&path("Esc")), None);
    }

    #[test]
    fn test_empty_path_is_ignored() {
        let mut root = TrieNode::new();
        assert_eq!(root.insert(&[], "nothing"), Some("nothing"));
        assert!(root.is_empty());
        assert_eq!(root.remove(&[]), None);
    }

    #[test]
    fn test_descend_empty_path_is_self() {
        let mut root = TrieNode::new();
        root.insert(&path("a"), 0);
        assert_eq!(root.descend(&[]).unwrap().child_count(), 1);
    }
}
