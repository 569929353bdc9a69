//! tagtree Core
//!
//! Editing sessions over the department hierarchy, table schemas and the
//! policy-tag taxonomy.
//!
//! # Core Concepts
//!
//! - [`EditingSession`]: Single writer for every tree on a page
//! - [`TreeSource`]: Async backend seam; [`JsonSource`] decodes raw bodies
//! - [`TagtreeConfig`]: Key mode, notification timing, log filter
//! - [`telemetry::init`]: Tracing subscriber from config
//!
//! # Example
//!
//! ```rust,ignore
//! use tagtree_core::prelude::*;
//!
//! let config = TagtreeConfig::from_toml_str(&text)?;
//! telemetry::init(&config)?;
//!
//! let mut session = EditingSession::new(config);
//! session.load_hierarchy(&source).await?;
//! session.rename_by_name("Infra", "Platform")?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod session;
mod source;
pub mod telemetry;

pub use config::{KeyMode, LogFormat, NotifyConfig, TagtreeConfig};
pub use error::{SessionError, SourceError};
pub use session::{EditingSession, FetchTicket, LoadOutcome};
pub use source::{JsonSource, TreeSource};

pub use tagtree_hierarchy as hierarchy;
pub use tagtree_notify as notify;
pub use tagtree_schema as schema;
pub use tagtree_tree as tree;

/// Prelude for common imports
pub mod prelude {
    pub use crate::telemetry;
    pub use crate::{
        EditingSession, JsonSource, KeyMode, LoadOutcome, SessionError, SourceError,
        TagtreeConfig, TreeSource,
    };
    pub use tagtree_hierarchy::{Hierarchy, HierarchyEdit, HierarchyNode, NodeId};
    pub use tagtree_notify::{Notification, Notifier, Severity};
    pub use tagtree_schema::{
        CheckedTags, FormState, PolicyTagNode, SchemaEdit, SchemaEditor, SchemaField,
    };
    pub use tagtree_tree::{ExpansionState, Forest, IndexPath, TreeNode, TreeStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
