//! tagtree Schema Tagging
//!
//! Nested table-schema editor for attaching tag-template entries and
//! policy tags to columns, including fields inside `RECORD`s.
//!
//! # Core Concepts
//!
//! - [`SchemaField`]: BigQuery-style column with nested `fields`, `tags`, `policyTags`
//! - [`SchemaEdit`]: Address-driven edits over a field list
//! - [`SchemaEditor`]: Field list owner with an invalidating row [`Selection`]
//! - [`PolicyTagNode`] / [`CheckedTags`]: Read-only taxonomy plus checked overlay
//! - [`TagTemplateForm`] / [`FormState`]: Template-driven tag forms
//!
//! # Example
//!
//! ```rust,ignore
//! use tagtree_schema::{CheckedTags, SchemaEditor};
//!
//! let mut editor = SchemaEditor::new(fields);
//! editor.toggle_selected(&"2.0".parse()?)?;
//! editor.apply_policy_tags(&checked)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod editor;
mod field;
mod form;
mod taxonomy;

pub use editor::{SchemaEdit, SchemaEditor, SchemaError, SchemaRow, Selection};
pub use field::{FieldMode, FieldType, PolicyTags, SchemaField, TagAttachment};
pub use form::{ControlKind, FieldStyle, FormError, FormFieldDef, FormState, TagTemplateForm};
pub use taxonomy::{CheckedTags, PolicyTagNode};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
