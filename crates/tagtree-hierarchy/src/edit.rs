//! Hierarchy edits
//!
//! Edits are keyed by [`NodeId`]. The `*_by_name` helpers reproduce the
//! display-name keyed behavior of the portal's first editor: locate returns
//! the first pre-order match, update and delete act on every match.

use crate::node::{HierarchyNode, NodeId};
use std::collections::HashSet;
use std::sync::Arc;
use tagtree_tree::{
    delete, delete_by, insert_child, iter_preorder, locate, locate_by, update, update_by, Edit,
    Forest,
};

/// Hierarchy forest
pub type Hierarchy = Forest<HierarchyNode>;

/// First node named `name`
#[inline]
#[must_use]
pub fn locate_by_name<'a>(forest: &'a [Arc<HierarchyNode>], name: &str) -> Option<&'a Arc<HierarchyNode>> {
    locate_by(forest, |n| n.name == name)
}

/// Replace every node named `name` with `transform(old)`
#[inline]
pub fn update_by_name<F>(forest: &[Arc<HierarchyNode>], name: &str, transform: F) -> Hierarchy
where
    F: FnMut(&HierarchyNode) -> HierarchyNode,
{
    update_by(forest, |n| n.name == name, transform)
}

/// Remove every node named `name`
#[inline]
pub fn delete_by_name(forest: &[Arc<HierarchyNode>], name: &str) -> Hierarchy {
    delete_by(forest, |n| n.name == name)
}

/// Check that no two nodes share a display name
///
/// Only needed when edits are addressed by name.
///
/// # Errors
/// Returns [`HierarchyError::DuplicateName`] naming the first repeat.
pub fn validate_unique_names(forest: &[Arc<HierarchyNode>]) -> Result<(), HierarchyError> {
    let mut seen = HashSet::new();
    for (_, node) in iter_preorder(forest) {
        if !seen.insert(node.name.as_str()) {
            return Err(HierarchyError::DuplicateName(node.name.clone()));
        }
    }
    Ok(())
}

/// Edit messages emitted by nested hierarchy rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyEdit {
    /// Append a new node under `parent`, or at the top level
    AddChild {
        parent: Option<NodeId>,
        node: HierarchyNode,
    },

    /// Change a node's display name
    Rename { id: NodeId, name: String },

    /// Change a node's description
    Describe { id: NodeId, description: String },

    /// Replace a node, children included
    Replace { id: NodeId, node: HierarchyNode },

    /// Remove a node and its subtree
    Delete { id: NodeId },

    /// Re-parent a node (drag and drop); `None` moves it to the top level
    Move {
        id: NodeId,
        new_parent: Option<NodeId>,
    },
}

impl HierarchyEdit {
    /// Target node of the edit, if any
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Self::AddChild { parent, .. } => *parent,
            Self::Rename { id, .. }
            | Self::Describe { id, .. }
            | Self::Replace { id, .. }
            | Self::Delete { id }
            | Self::Move { id, .. } => Some(*id),
        }
    }
}

impl Edit<Hierarchy> for HierarchyEdit {
    type Error = HierarchyError;

    fn apply(&self, forest: &Hierarchy) -> Result<Hierarchy, HierarchyError> {
        match self {
            Self::AddChild { parent, node } => {
                ensure_name(&node.name)?;
                ensure_fresh_ids(forest, node, &HashSet::new())?;
                Ok(insert_child(forest, parent.as_ref(), node.clone()))
            }
            Self::Rename { id, name } => {
                ensure_name(name)?;
                Ok(update(forest, id, |n| n.renamed(name.clone())))
            }
            Self::Describe { id, description } => {
                Ok(update(forest, id, |n| n.described(description.clone())))
            }
            Self::Replace { id, node } => {
                ensure_name(&node.name)?;
                let Some(old) = locate(forest, id) else {
                    return Ok(forest.clone());
                };
                // The target keeps its id; ids from its old subtree may be reused
                let replacement = HierarchyNode {
                    id: *id,
                    ..node.clone()
                };
                let mut reusable = HashSet::new();
                collect_ids(old, &mut reusable);
                ensure_fresh_ids(forest, &replacement, &reusable)?;
                Ok(update(forest, id, |_| replacement.clone()))
            }
            Self::Delete { id } => Ok(delete(forest, id)),
            Self::Move { id, new_parent } => move_node(forest, *id, *new_parent),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::AddChild { parent: Some(p), node } => format!("add '{}' under {p}", node.name),
            Self::AddChild { parent: None, node } => format!("add '{}' at top level", node.name),
            Self::Rename { id, name } => format!("rename {id} to '{name}'"),
            Self::Describe { id, .. } => format!("describe {id}"),
            Self::Replace { id, .. } => format!("replace {id}"),
            Self::Delete { id } => format!("delete {id}"),
            Self::Move { id, new_parent: Some(p) } => format!("move {id} under {p}"),
            Self::Move { id, new_parent: None } => format!("move {id} to top level"),
        }
    }
}

fn ensure_name(name: &str) -> Result<(), HierarchyError> {
    if name.trim().is_empty() {
        Err(HierarchyError::EmptyName)
    } else {
        Ok(())
    }
}

fn collect_ids(node: &HierarchyNode, out: &mut HashSet<NodeId>) {
    out.insert(node.id);
    for child in &node.children {
        collect_ids(child, out);
    }
}

// Every id in `node`'s subtree must be unique and absent from `forest`,
// except ids listed in `reusable`
fn ensure_fresh_ids(
    forest: &Hierarchy,
    node: &HierarchyNode,
    reusable: &HashSet<NodeId>,
) -> Result<(), HierarchyError> {
    let taken: HashSet<NodeId> = iter_preorder(forest)
        .map(|(_, n)| n.id)
        .filter(|id| !reusable.contains(id))
        .collect();
    let mut seen = HashSet::new();
    let mut stack = vec![node];
    while let Some(next) = stack.pop() {
        if taken.contains(&next.id) || !seen.insert(next.id) {
            return Err(HierarchyError::DuplicateId(next.id));
        }
        stack.extend(next.children.iter().map(|c| &**c));
    }
    Ok(())
}

fn move_node(
    forest: &Hierarchy,
    id: NodeId,
    new_parent: Option<NodeId>,
) -> Result<Hierarchy, HierarchyError> {
    let Some(node) = locate(forest, &id) else {
        return Ok(forest.clone());
    };

    if let Some(parent) = new_parent {
        if parent == id || locate(&node.children, &parent).is_some() {
            return Err(HierarchyError::CycleRejected { id, parent });
        }
        if locate(forest, &parent).is_none() {
            return Ok(forest.clone());
        }
    }

    let moved = (**node).clone();
    let detached = delete(forest, &id);
    tracing::debug!(%id, "moving hierarchy node");
    Ok(insert_child(&detached, new_parent.as_ref(), moved))
}

/// Hierarchy edit errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    /// Blank display name
    #[error("department name must not be empty")]
    EmptyName,

    /// Two nodes share a display name
    #[error("duplicate department name: {0}")]
    DuplicateName(String),

    /// Inserted or replacing subtree carries an id already in use
    #[error("node id already in use: {0}")]
    DuplicateId(NodeId),

    /// Moving a node under itself or one of its descendants
    #[error("cannot move {id} under its own subtree ({parent})")]
    CycleRejected { id: NodeId, parent: NodeId },
}
