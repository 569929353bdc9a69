//! Policy-tag taxonomy
//!
//! The taxonomy tree is read-only on the client. Only the [`CheckedTags`]
//! overlay changes while a user picks tags for the selected fields.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tagtree_tree::{iter_preorder, locate, Forest, TreeNode};

use crate::field::PolicyTags;

/// One policy tag and its sub-tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTagNode {
    pub display_name: String,
    /// Backend resource id
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_tags: Forest<PolicyTagNode>,
}

impl PolicyTagNode {
    /// Leaf tag
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            id: id.into(),
            sub_tags: Vec::new(),
        }
    }

    /// Append a sub-tag
    #[must_use]
    pub fn with_sub_tag(mut self, tag: PolicyTagNode) -> Self {
        self.sub_tags.push(Arc::new(tag));
        self
    }
}

impl TreeNode for PolicyTagNode {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }

    fn children(&self) -> &[Arc<Self>] {
        &self.sub_tags
    }

    fn with_children(&self, children: Forest<Self>) -> Self {
        Self {
            display_name: self.display_name.clone(),
            id: self.id.clone(),
            sub_tags: children,
        }
    }
}

/// Checked overlay over a taxonomy, in check order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckedTags {
    ids: IndexSet<String>,
}

impl CheckedTags {
    /// Nothing checked
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from tags already attached to a field
    #[must_use]
    pub fn from_policy_tags(tags: &PolicyTags) -> Self {
        Self {
            ids: tags.names.iter().cloned().collect(),
        }
    }

    /// Whether `id` is checked
    #[inline]
    #[must_use]
    pub fn is_checked(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip `id`, returning the new state
    pub fn toggle(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.ids.shift_remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Check `id`
    #[inline]
    pub fn check(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    /// Uncheck `id`
    #[inline]
    pub fn uncheck(&mut self, id: &str) {
        self.ids.shift_remove(id);
    }

    /// Checked ids in check order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Number of checked ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is checked
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop ids missing from `taxonomy`, returning how many were dropped
    pub fn retain_present(&mut self, taxonomy: &[Arc<PolicyTagNode>]) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| locate(taxonomy, id.as_str()).is_some());
        before - self.ids.len()
    }

    /// Checked nodes in taxonomy pre-order
    #[must_use]
    pub fn resolve<'a>(&self, taxonomy: &'a [Arc<PolicyTagNode>]) -> Vec<&'a Arc<PolicyTagNode>> {
        iter_preorder(taxonomy)
            .map(|(_, node)| node)
            .filter(|node| self.ids.contains(node.id.as_str()))
            .collect()
    }

    /// Convert to the field payload shape
    #[must_use]
    pub fn to_policy_tags(&self) -> PolicyTags {
        PolicyTags {
            names: self.ids.iter().cloned().collect(),
        }
    }
}
