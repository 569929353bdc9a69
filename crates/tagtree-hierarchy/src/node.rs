//! Department hierarchy nodes

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tagtree_tree::{Forest, TreeNode};
use ulid::Ulid;

/// Stable node identifier (ULID for sortability)
///
/// Generated when a node is created and never edited, so renames and
/// duplicate display names cannot make an edit ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Ulid);

impl NodeId {
    /// Generate new node ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One department in the hierarchy
///
/// Backend payloads carry no id; one is generated on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Stable key
    #[serde(default)]
    pub id: NodeId,
    /// Display name, editable
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Sub-departments in display order
    #[serde(default)]
    pub children: Forest<HierarchyNode>,
}

impl HierarchyNode {
    /// Create a childless node with a fresh id
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            description: description.into(),
            children: Vec::new(),
        }
    }

    /// Append a child
    #[must_use]
    pub fn with_child(mut self, child: HierarchyNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Copy carrying a new name
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy carrying a new description
    #[must_use]
    pub fn described(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }
}

impl TreeNode for HierarchyNode {
    type Key = NodeId;

    fn key(&self) -> &NodeId {
        &self.id
    }

    fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    fn with_children(&self, children: Forest<Self>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        let a = HierarchyNode::new("Eng", "");
        let b = HierarchyNode::new("Eng", "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn rename_keeps_id() {
        let node = HierarchyNode::new("Eng", "Engineering");
        let renamed = node.renamed("R&D");
        assert_eq!(renamed.id, node.id);
        assert_eq!(renamed.description, "Engineering");
    }

    #[test]
    fn deserialize_backend_shape_generates_ids() {
        let json = r#"[{"name":"Eng","description":"Engineering","children":[
            {"name":"Infra","description":"Infra team","children":[]}]}]"#;
        let forest: Forest<HierarchyNode> = serde_json::from_str(json).unwrap();
        assert_eq!(forest[0].children[0].name, "Infra");
        assert_ne!(forest[0].id, forest[0].children[0].id);
    }

    #[test]
    fn serialize_keeps_id() {
        let node = HierarchyNode::new("Eng", "");
        let value = serde_json::to_value(&node).unwrap();
        let back: HierarchyNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }
}
