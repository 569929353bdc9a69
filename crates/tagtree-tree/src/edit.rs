//! Copy-on-write tree edits
//!
//! Locate, update and delete never touch their input. Update and delete
//! allocate new nodes only along the path from a changed node to the root;
//! every other subtree is shared with the input by `Arc`.
//!
//! # Matching
//! Update and delete act on *every* node whose key matches, at every level.
//! Locate returns the first match in depth-first pre-order.

use crate::node::{iter_preorder, Forest, TreeNode};
use std::sync::Arc;

/// First node matching `predicate`, depth-first pre-order
#[must_use]
pub fn locate_by<N, P>(forest: &[Arc<N>], mut predicate: P) -> Option<&Arc<N>>
where
    N: TreeNode,
    P: FnMut(&N) -> bool,
{
    iter_preorder(forest)
        .map(|(_, node)| node)
        .find(|node| predicate(node))
}

/// First node whose key equals `key`
///
/// Returns `None` for a miss or an empty forest.
#[inline]
#[must_use]
pub fn locate<'a, N>(forest: &'a [Arc<N>], key: &N::Key) -> Option<&'a Arc<N>>
where
    N: TreeNode,
{
    locate_by(forest, |n| n.key() == key)
}

/// Replace every node matching `predicate` with `transform(old)`
///
/// The transform receives the old node and returns the complete new node,
/// children included. Matched nodes are not searched further.
pub fn update_by<N, P, F>(forest: &[Arc<N>], predicate: P, mut transform: F) -> Forest<N>
where
    N: TreeNode,
    P: Fn(&N) -> bool,
    F: FnMut(&N) -> N,
{
    update_level(forest, &predicate, &mut transform).unwrap_or_else(|| forest.to_vec())
}

/// Replace every node keyed `key` with `transform(old)`
#[inline]
pub fn update<N, F>(forest: &[Arc<N>], key: &N::Key, transform: F) -> Forest<N>
where
    N: TreeNode,
    F: FnMut(&N) -> N,
{
    update_by(forest, |n| n.key() == key, transform)
}

// None when nothing at or below this level changed
fn update_level<N, P, F>(forest: &[Arc<N>], predicate: &P, transform: &mut F) -> Option<Forest<N>>
where
    N: TreeNode,
    P: Fn(&N) -> bool,
    F: FnMut(&N) -> N,
{
    let mut out: Option<Forest<N>> = None;
    for (i, node) in forest.iter().enumerate() {
        let replaced = if predicate(node) {
            Some(Arc::new(transform(node)))
        } else if node.is_leaf() {
            None
        } else {
            update_level(node.children(), predicate, transform)
                .map(|children| Arc::new(node.with_children(children)))
        };

        if let Some(new) = replaced {
            out.get_or_insert_with(|| forest[..i].to_vec()).push(new);
        } else if let Some(out) = out.as_mut() {
            out.push(Arc::clone(node));
        }
    }
    out
}

/// Remove every node matching `predicate`, at every level
pub fn delete_by<N, P>(forest: &[Arc<N>], predicate: P) -> Forest<N>
where
    N: TreeNode,
    P: Fn(&N) -> bool,
{
    delete_level(forest, &predicate).unwrap_or_else(|| forest.to_vec())
}

/// Remove every node keyed `key`
///
/// Duplicate keys are all removed, including a match nested under another
/// match's sibling.
#[inline]
pub fn delete<N>(forest: &[Arc<N>], key: &N::Key) -> Forest<N>
where
    N: TreeNode,
{
    delete_by(forest, |n| n.key() == key)
}

fn delete_level<N, P>(forest: &[Arc<N>], predicate: &P) -> Option<Forest<N>>
where
    N: TreeNode,
    P: Fn(&N) -> bool,
{
    let mut out: Option<Forest<N>> = None;
    for (i, node) in forest.iter().enumerate() {
        if predicate(node) {
            out.get_or_insert_with(|| forest[..i].to_vec());
            continue;
        }

        let kept = if node.is_leaf() {
            None
        } else {
            delete_level(node.children(), predicate)
                .map(|children| Arc::new(node.with_children(children)))
        };

        if let Some(new) = kept {
            out.get_or_insert_with(|| forest[..i].to_vec()).push(new);
        } else if let Some(out) = out.as_mut() {
            out.push(Arc::clone(node));
        }
    }
    out
}

/// Append `child` under every node keyed `parent`, or at the top level
///
/// A missing parent leaves the forest unchanged.
pub fn insert_child<N>(forest: &[Arc<N>], parent: Option<&N::Key>, child: N) -> Forest<N>
where
    N: TreeNode,
{
    let child = Arc::new(child);
    match parent {
        None => {
            let mut out = forest.to_vec();
            out.push(child);
            out
        }
        Some(key) => update(forest, key, |node| {
            let mut children = node.children().to_vec();
            children.push(Arc::clone(&child));
            node.with_children(children)
        }),
    }
}
