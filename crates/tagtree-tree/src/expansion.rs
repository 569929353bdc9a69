//! Expand/collapse overlay for tree rows
//!
//! Kept apart from the tree data: a refetch replaces the tree but the
//! overlay survives, minus keys that no longer exist.

use crate::node::{iter_preorder, TreeNode};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// Set of expanded node keys
///
/// Backed by a persistent set so a render pass can snapshot it with a
/// cheap clone. A key not in the set renders collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionState<K: Hash + Eq + Clone> {
    expanded: im::HashSet<K>,
}

impl<K: Hash + Eq + Clone> ExpansionState<K> {
    /// Everything collapsed
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            expanded: im::HashSet::new(),
        }
    }

    /// Whether `key` renders expanded
    #[inline]
    #[must_use]
    pub fn is_expanded<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.expanded.contains(key)
    }

    /// Mark `key` expanded
    #[inline]
    pub fn expand(&mut self, key: K) {
        self.expanded.insert(key);
    }

    /// Mark `key` collapsed
    #[inline]
    pub fn collapse<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.expanded.remove(key);
    }

    /// Flip `key`, returning the new state
    pub fn toggle(&mut self, key: K) -> bool {
        if self.expanded.remove(&key).is_some() {
            false
        } else {
            self.expanded.insert(key);
            true
        }
    }

    /// Expand every key in `keys`
    pub fn expand_all(&mut self, keys: impl IntoIterator<Item = K>) {
        for key in keys {
            self.expanded.insert(key);
        }
    }

    /// Collapse everything
    #[inline]
    pub fn collapse_all(&mut self) {
        self.expanded = im::HashSet::new();
    }

    /// Number of expanded keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// True when nothing is expanded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Drop keys whose nodes are no longer in `forest`
    ///
    /// Returns the number of keys dropped.
    pub fn retain_present<N>(&mut self, forest: &[Arc<N>]) -> usize
    where
        N: TreeNode,
        N::Key: Hash + Eq,
        K: Borrow<N::Key>,
    {
        let present: HashSet<&N::Key> = iter_preorder(forest).map(|(_, n)| n.key()).collect();
        let before = self.expanded.len();
        self.expanded = self
            .expanded
            .iter()
            .filter(|k| {
                let key: &N::Key = (*k).borrow();
                present.contains(key)
            })
            .cloned()
            .collect();
        before - self.expanded.len()
    }
}

impl<K: Hash + Eq + Clone> Default for ExpansionState<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::fixtures::*;

    #[test]
    fn absent_key_is_collapsed() {
        let state: ExpansionState<String> = ExpansionState::new();
        assert!(!state.is_expanded("Eng"));
        assert!(state.is_empty());
    }

    #[test]
    fn toggle_flips() {
        let mut state = ExpansionState::new();
        assert!(state.toggle("Eng".to_string()));
        assert!(state.is_expanded("Eng"));
        assert!(!state.toggle("Eng".to_string()));
        assert!(!state.is_expanded("Eng"));
    }

    #[test]
    fn keys_are_independent() {
        let mut state = ExpansionState::new();
        state.expand_all(["a".to_string(), "b".to_string()]);
        state.collapse("a");
        assert!(!state.is_expanded("a"));
        assert!(state.is_expanded("b"));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_toggles() {
        let mut state = ExpansionState::new();
        state.expand("a".to_string());
        let snapshot = state.clone();
        state.collapse_all();
        assert!(snapshot.is_expanded("a"));
        assert!(state.is_empty());
    }

    #[test]
    fn retain_present_prunes_stale_keys() {
        let forest = vec![Arc::new(branch("a", vec![leaf("a1")])), Arc::new(leaf("b"))];
        let mut state = ExpansionState::new();
        state.expand_all(["a".to_string(), "a1".to_string(), "gone".to_string()]);

        let dropped = state.retain_present(&forest);
        assert_eq!(dropped, 1);
        assert!(state.is_expanded("a1"));
        assert!(!state.is_expanded("gone"));
    }
}
