//! Named matching contexts.

use crate::combo::Combo;
use crate::registry::Callback;
use crate::trie::TrieNode;

/// Name of the scope that is active until someone switches.
pub const DEFAULT_SCOPE: &str = "global";

/// One named context: its own trie plus how far into it the user has typed.
///
/// The cursor is stored as the path of combos consumed from the root, so it
/// can never dangle. A removal that prunes part of that path sends the
/// cursor back to the root, so re-registering the same path later does not
/// resume a half-typed sequence.
pub(crate) struct Scope {
    root: TrieNode<Callback>,
    cursor: Vec<Combo>,
}

impl Scope {
    pub(crate) fn new() -> Self {
        Self {
            root: TrieNode::new(),
            cursor: Vec::new(),
        }
    }

    pub(crate) fn root(&self) -> &TrieNode<Callback> {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut TrieNode<Callback> {
        &mut self.root
    }

    /// Unbind the callback at `path`, resetting the cursor if the removal
    /// pruned the node it pointed at.
    pub(crate) fn remove(&mut self, path: &[Combo]) -> Option<Callback> {
        let removed = self.root.remove(path);
        if self.root.descend(&self.cursor).is_none() {
            self.cursor.clear();
        }
        removed
    }

    /// The node the cursor points at, falling back to the root.
    pub(crate) fn cursor_node(&self) -> &TrieNode<Callback> {
        self.root.descend(&self.cursor).unwrap_or(&self.root)
    }

    /// The cursor path, or an empty path if it no longer resolves.
    pub(crate) fn cursor_path(&self) -> &[Combo] {
        if self.root.descend(&self.cursor).is_some() {
            self.cursor.as_slice()
        } else {
            &[]
        }
    }

    /// Move the cursor one edge down from where it currently resolves.
    pub(crate) fn advance(&mut self, combo: Combo) {
        if self.root.descend(&self.cursor).is_none() {
            self.cursor.clear();
        }
        self.cursor.push(combo);
    }

    pub(crate) fn reset_cursor(&mut self) {
        self.cursor.clear();
    }

    pub(crate) fn is_at_root(&self) -> bool {
        self.cursor_path().is_empty()
    }
}
