//! tagtree Tree Primitives
//!
//! Copy-on-write editing of labeled trees with structural sharing.
//!
//! # Core Concepts
//!
//! - [`TreeNode`]: Trait for nodes owning an ordered list of `Arc` children
//! - [`locate`], [`update`], [`delete`]: Keyed tree edits that never mutate input
//! - [`IndexPath`]: Typed position through nested collections (`"2.0.1"`)
//! - [`Nested`]: Trait for values resolved by [`IndexPath`]
//! - [`ExpansionState`]: Expand/collapse overlay keyed by node key
//! - [`TreeStore`]: Single-writer owner publishing every new tree value
//!
//! # Example
//!
//! ```rust,ignore
//! use tagtree_tree::{locate, update};
//!
//! let renamed = update(&forest, &id, |n| n.renamed("Platform"));
//! assert!(locate(&renamed, &id).is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod address;
mod edit;
mod expansion;
mod node;
mod path;
mod store;

// Re-exports
pub use address::{
    addresses, get, get_mut, modify, try_get, try_get_mut, AddressError, Nested,
};
pub use edit::{delete, delete_by, insert_child, locate, locate_by, update, update_by};
pub use expansion::ExpansionState;
pub use node::{count, iter_preorder, Forest, Preorder, TreeNode};
pub use path::{IndexPath, PathError};
pub use store::{Edit, TreeStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
