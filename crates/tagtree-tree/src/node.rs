//! Node abstraction shared by every editable tree
//!
//! A tree is a [`Forest`]: an ordered sequence of reference-counted nodes.
//! Nodes are immutable once built; edits produce a new forest that reuses
//! every untouched subtree by `Arc`.

use std::sync::Arc;

/// Ordered top-level sequence of nodes
pub type Forest<N> = Vec<Arc<N>>;

/// A labeled node that owns an ordered list of children
///
/// Implementors decide what the addressing key is: the hierarchy keys on a
/// generated id, the policy taxonomy on its backend id.
pub trait TreeNode: Clone {
    /// Key used by locate/update/delete
    type Key: PartialEq + ?Sized;

    /// Key of this node
    fn key(&self) -> &Self::Key;

    /// Children in display order
    fn children(&self) -> &[Arc<Self>];

    /// Shallow copy of this node carrying `children` instead of its own
    #[must_use]
    fn with_children(&self, children: Forest<Self>) -> Self;

    /// True when the node has no children
    #[inline]
    fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }
}

/// Depth-first pre-order iterator over a forest
#[derive(Debug)]
pub struct Preorder<'a, N> {
    stack: Vec<(usize, &'a Arc<N>)>,
}

impl<'a, N: TreeNode> Preorder<'a, N> {
    /// Start iterating at the top level of `forest`
    #[must_use]
    pub fn new(forest: &'a [Arc<N>]) -> Self {
        Self {
            stack: forest.iter().rev().map(|n| (0, n)).collect(),
        }
    }
}

impl<'a, N: TreeNode> Iterator for Preorder<'a, N> {
    /// `(depth, node)`, depth 0 for top-level nodes
    type Item = (usize, &'a Arc<N>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

/// Iterate a forest depth-first, pre-order
#[inline]
#[must_use]
pub fn iter_preorder<N: TreeNode>(forest: &[Arc<N>]) -> Preorder<'_, N> {
    Preorder::new(forest)
}

/// Total number of nodes in a forest
#[inline]
#[must_use]
pub fn count<N: TreeNode>(forest: &[Arc<N>]) -> usize {
    iter_preorder(forest).count()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal name-keyed node used by the crate's unit tests
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct Dept {
        pub(crate) name: String,
        pub(crate) description: String,
        pub(crate) children: Forest<Dept>,
    }

    impl TreeNode for Dept {
        type Key = str;

        fn key(&self) -> &str {
            &self.name
        }

        fn children(&self) -> &[Arc<Self>] {
            &self.children
        }

        fn with_children(&self, children: Forest<Self>) -> Self {
            Self {
                name: self.name.clone(),
                description: self.description.clone(),
                children,
            }
        }
    }

    pub(crate) fn dept(name: &str, description: &str, children: Vec<Dept>) -> Arc<Dept> {
        Arc::new(Dept {
            name: name.to_string(),
            description: description.to_string(),
            children: children.into_iter().map(Arc::new).collect(),
        })
    }

    pub(crate) fn leaf(name: &str) -> Dept {
        Dept {
            name: name.to_string(),
            description: String::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn branch(name: &str, children: Vec<Dept>) -> Dept {
        Dept {
            name: name.to_string(),
            description: String::new(),
            children: children.into_iter().map(Arc::new).collect(),
        }
    }
}
