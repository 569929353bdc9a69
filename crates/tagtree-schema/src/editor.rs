//! Table-schema tag editor
//!
//! Rows are addressed by [`IndexPath`]. Addresses are only valid against the
//! field list they were computed from, so the editor drops its selection
//! whenever the list changes shape, and by default after every apply.

use std::collections::BTreeSet;
use std::sync::Arc;

use tagtree_tree::{addresses, try_get, try_get_mut, AddressError, Edit, IndexPath, TreeStore};

use crate::field::{SchemaField, TagAttachment};
use crate::taxonomy::CheckedTags;

/// Edit messages over a table schema
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaEdit {
    /// Attach policy tags to each addressed field
    AddPolicyTags {
        paths: Vec<IndexPath>,
        ids: Vec<String>,
    },

    /// Detach one policy tag from a field
    RemovePolicyTag { path: IndexPath, id: String },

    /// Attach (or replace) a tag-template entry on each addressed field
    AttachTag {
        paths: Vec<IndexPath>,
        tag: TagAttachment,
    },

    /// Detach the entry for a template from a field
    RemoveTag {
        path: IndexPath,
        template_id: String,
    },

    /// Overwrite a field's whole tag list
    SetTags {
        path: IndexPath,
        tags: Vec<TagAttachment>,
    },

    /// Change a field's description
    SetDescription { path: IndexPath, description: String },

    /// Append a field to a record, or to the root list
    InsertField {
        parent: Option<IndexPath>,
        field: SchemaField,
    },

    /// Remove a field and everything nested in it
    RemoveField { path: IndexPath },
}

impl SchemaEdit {
    /// Whether the edit inserts or removes fields
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::InsertField { .. } | Self::RemoveField { .. })
    }
}

impl Edit<Vec<SchemaField>> for SchemaEdit {
    type Error = SchemaError;

    fn apply(&self, fields: &Vec<SchemaField>) -> Result<Vec<SchemaField>, SchemaError> {
        let mut next = fields.clone();
        match self {
            Self::AddPolicyTags { paths, ids } => {
                for path in paths {
                    let field = try_get_mut(&mut next, path)?;
                    for id in ids {
                        field.add_policy_tag(id.clone());
                    }
                }
            }
            Self::RemovePolicyTag { path, id } => {
                try_get_mut(&mut next, path)?.remove_policy_tag(id);
            }
            Self::AttachTag { paths, tag } => {
                for path in paths {
                    try_get_mut(&mut next, path)?.attach_tag(tag.clone());
                }
            }
            Self::RemoveTag { path, template_id } => {
                try_get_mut(&mut next, path)?.remove_tag(template_id);
            }
            Self::SetTags { path, tags } => {
                try_get_mut(&mut next, path)?.tags = tags.clone();
            }
            Self::SetDescription { path, description } => {
                try_get_mut(&mut next, path)?.description = description.clone();
            }
            Self::InsertField { parent: None, field } => next.push(field.clone()),
            Self::InsertField {
                parent: Some(parent),
                field,
            } => {
                let record = try_get_mut(&mut next, parent)?;
                if !record.field_type.is_record() {
                    return Err(SchemaError::NotARecord(parent.clone()));
                }
                record.fields.push(field.clone());
            }
            Self::RemoveField { path } => {
                let idx = path.last().ok_or(AddressError::Root)?;
                let level = match path.parent() {
                    None => &mut next,
                    Some(parent) => &mut try_get_mut(&mut next, &parent)?.fields,
                };
                if idx >= level.len() {
                    return Err(AddressError::OutOfRange {
                        path: path.clone(),
                        depth: path.depth() - 1,
                        index: idx,
                        len: level.len(),
                    }
                    .into());
                }
                level.remove(idx);
            }
        }
        Ok(next)
    }

    fn describe(&self) -> String {
        match self {
            Self::AddPolicyTags { paths, ids } => {
                format!("add {} policy tag(s) to {} field(s)", ids.len(), paths.len())
            }
            Self::RemovePolicyTag { path, id } => format!("remove policy tag {id} from {path}"),
            Self::AttachTag { paths, tag } => format!(
                "attach tag {} to {} field(s)",
                tag.tag_template_form_id,
                paths.len()
            ),
            Self::RemoveTag { path, template_id } => format!("remove tag {template_id} from {path}"),
            Self::SetTags { path, tags } => format!("set {} tag(s) on {path}", tags.len()),
            Self::SetDescription { path, .. } => format!("describe {path}"),
            Self::InsertField { parent: Some(p), field } => format!("insert '{}' under {p}", field.name),
            Self::InsertField { parent: None, field } => format!("insert '{}' at root", field.name),
            Self::RemoveField { path } => format!("remove field {path}"),
        }
    }
}

/// One rendered schema row
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRow {
    pub path: IndexPath,
    pub field: SchemaField,
    pub selected: bool,
}

/// Rows picked by the user, valid for one shape of the field list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: BTreeSet<IndexPath>,
}

impl Selection {
    /// Selected addresses in row order
    pub fn iter(&self) -> impl Iterator<Item = &IndexPath> {
        self.paths.iter()
    }

    /// Number of selected rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when no row is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Owner of one table's schema during an editing session
#[derive(Debug)]
pub struct SchemaEditor {
    store: TreeStore<Vec<SchemaField>>,
    selection: Option<Selection>,
    clear_on_apply: bool,
}

impl SchemaEditor {
    /// Editor over `fields`, nothing selected
    #[must_use]
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self {
            store: TreeStore::new(fields),
            selection: None,
            clear_on_apply: true,
        }
    }

    /// Keep or drop the selection after non-structural applies
    #[inline]
    #[must_use]
    pub fn with_clear_on_apply(mut self, clear: bool) -> Self {
        self.clear_on_apply = clear;
        self
    }

    /// Current fields
    #[inline]
    #[must_use]
    pub fn fields(&self) -> Arc<Vec<SchemaField>> {
        self.store.get()
    }

    /// Underlying store, for subscribing to changes
    #[inline]
    #[must_use]
    pub fn store(&self) -> &TreeStore<Vec<SchemaField>> {
        &self.store
    }

    /// Current selection, `None` once invalidated
    #[inline]
    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Whether the row at `path` is selected
    #[must_use]
    pub fn is_selected(&self, path: &IndexPath) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.paths.contains(path))
    }

    /// Flip selection of the row at `path`
    ///
    /// # Errors
    /// Returns [`SchemaError::Address`] if `path` does not name a field.
    pub fn toggle_selected(&mut self, path: &IndexPath) -> Result<bool, SchemaError> {
        let fields = self.store.get();
        try_get(fields.as_slice(), path)?;
        let selection = self.selection.get_or_insert_with(Selection::default);
        if selection.paths.remove(path) {
            Ok(false)
        } else {
            selection.paths.insert(path.clone());
            Ok(true)
        }
    }

    /// Drop the selection
    #[inline]
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Rows in display order with their addresses
    #[must_use]
    pub fn rows(&self) -> Vec<SchemaRow> {
        let fields = self.store.get();
        addresses(fields.as_slice())
            .into_iter()
            .map(|(path, field)| SchemaRow {
                selected: self.is_selected(&path),
                field: field.clone(),
                path,
            })
            .collect()
    }

    /// Apply checked policy tags to every selected row
    ///
    /// # Errors
    /// Returns [`SchemaError::NothingSelected`] without a selection,
    /// [`SchemaError::NothingChecked`] without checked tags, or the edit's
    /// error. Fields and selection are unchanged on error.
    pub fn apply_policy_tags(&mut self, checked: &CheckedTags) -> Result<usize, SchemaError> {
        let paths = self.selected_paths()?;
        if checked.is_empty() {
            return Err(SchemaError::NothingChecked);
        }
        let count = paths.len();
        self.apply(&SchemaEdit::AddPolicyTags {
            paths,
            ids: checked.iter().map(str::to_string).collect(),
        })?;
        Ok(count)
    }

    /// Attach a tag-template entry to every selected row
    ///
    /// # Errors
    /// Returns [`SchemaError::NothingSelected`] without a selection, or the
    /// edit's error.
    pub fn apply_tag(&mut self, tag: TagAttachment) -> Result<usize, SchemaError> {
        let paths = self.selected_paths()?;
        let count = paths.len();
        self.apply(&SchemaEdit::AttachTag { paths, tag })?;
        Ok(count)
    }

    /// Apply an edit and publish the new field list
    ///
    /// # Errors
    /// Returns the edit's error; fields and selection are left unchanged.
    pub fn apply(&mut self, edit: &SchemaEdit) -> Result<u64, SchemaError> {
        let revision = self.store.apply(edit)?;
        if edit.is_structural() || self.clear_on_apply {
            if self.selection.take().is_some() {
                tracing::debug!(revision, structural = edit.is_structural(), "selection cleared");
            }
        }
        Ok(revision)
    }

    /// Replace the whole field list (refetch)
    pub fn replace(&mut self, fields: Vec<SchemaField>) -> u64 {
        self.selection = None;
        self.store.replace(fields)
    }

    fn selected_paths(&self) -> Result<Vec<IndexPath>, SchemaError> {
        match &self.selection {
            Some(selection) if !selection.is_empty() => Ok(selection.iter().cloned().collect()),
            _ => Err(SchemaError::NothingSelected),
        }
    }
}

/// Schema editing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Stale or malformed field address
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Nested insert under a non-record field
    #[error("field at {0} is not a record")]
    NotARecord(IndexPath),

    /// Bulk apply with no selected rows
    #[error("no fields selected")]
    NothingSelected,

    /// Policy-tag apply with no tags checked
    #[error("no policy tags checked")]
    NothingChecked,
}
