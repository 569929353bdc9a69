//! tagtree Department Hierarchy
//!
//! Recursive department tree edited through [`HierarchyEdit`] messages.
//!
//! # Core Concepts
//!
//! - [`HierarchyNode`]: Department with a stable [`NodeId`], name, description
//! - [`HierarchyEdit`]: Add, rename, describe, replace, delete, move
//! - [`locate_by_name`] and friends: display-name keyed compatibility helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use tagtree_hierarchy::{HierarchyEdit, HierarchyNode};
//! use tagtree_tree::TreeStore;
//!
//! let mut store = TreeStore::new(vec![Arc::new(HierarchyNode::new("Eng", "Engineering"))]);
//! store.apply(&HierarchyEdit::Rename { id, name: "R&D".into() })?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod edit;
mod node;

pub use edit::{
    delete_by_name, locate_by_name, update_by_name, validate_unique_names, Hierarchy,
    HierarchyEdit, HierarchyError,
};
pub use node::{HierarchyNode, NodeId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
