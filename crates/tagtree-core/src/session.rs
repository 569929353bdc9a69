//! Editing session
//!
//! One session owns every tree a portal page edits: the department
//! hierarchy, one table's schema, and the policy-tag taxonomy with its
//! checked overlay. It is the single writer for all of them.
//!
//! Fetches are split into [`EditingSession::begin_fetch`] and a `finish_*`
//! call so a response arriving after [`EditingSession::close`] can be
//! recognized and dropped. The `load_*` methods do both halves.

use crate::config::{KeyMode, TagtreeConfig};
use crate::error::{SessionError, SourceError};
use crate::source::TreeSource;
use std::sync::Arc;
use tagtree_hierarchy::{
    delete_by_name, locate_by_name, update_by_name, validate_unique_names, Hierarchy,
    HierarchyEdit, HierarchyError, NodeId,
};
use tagtree_notify::{Notification, Notifier};
use tagtree_schema::{CheckedTags, FormState, PolicyTagNode, SchemaEdit, SchemaEditor, SchemaField};
use tagtree_tree::{count, ExpansionState, Forest, TreeStore};

/// Proof that a fetch was started in a given session generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    /// Generation the fetch belongs to
    #[inline]
    #[must_use]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Result of finishing a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// New value published at `revision`
    Loaded { revision: u64 },
    /// Fetch failed; reported through the notifier, previous value kept
    Failed,
    /// Session closed or refetched since the fetch began; result dropped
    Stale,
}

impl LoadOutcome {
    /// Whether a new value was published
    #[inline]
    #[must_use]
    pub fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Single owner of the trees edited on one page
#[derive(Debug)]
pub struct EditingSession {
    config: TagtreeConfig,
    notifier: Notifier,
    generation: u64,
    closed: bool,

    hierarchy: TreeStore<Hierarchy>,
    expansion: ExpansionState<NodeId>,

    table: Option<String>,
    schema: SchemaEditor,

    taxonomy: TreeStore<Forest<PolicyTagNode>>,
    checked: CheckedTags,
}

impl EditingSession {
    /// Session with its own notifier
    #[must_use]
    pub fn new(config: TagtreeConfig) -> Self {
        let notifier = Notifier::with_policy(config.dismiss_policy());
        Self::with_notifier(config, notifier)
    }

    /// Session reporting through a shared notifier
    #[must_use]
    pub fn with_notifier(config: TagtreeConfig, notifier: Notifier) -> Self {
        let schema = SchemaEditor::new(Vec::new()).with_clear_on_apply(config.clear_selection_on_edit);
        Self {
            config,
            notifier,
            generation: 0,
            closed: false,
            hierarchy: TreeStore::default(),
            expansion: ExpansionState::new(),
            table: None,
            schema,
            taxonomy: TreeStore::default(),
            checked: CheckedTags::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &TagtreeConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Current fetch generation
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Current hierarchy snapshot
    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> Arc<Hierarchy> {
        self.hierarchy.get()
    }

    /// Hierarchy store, for subscribing to changes
    #[inline]
    #[must_use]
    pub fn hierarchy_store(&self) -> &TreeStore<Hierarchy> {
        &self.hierarchy
    }

    #[inline]
    #[must_use]
    pub fn expansion(&self) -> &ExpansionState<NodeId> {
        &self.expansion
    }

    #[inline]
    pub fn expansion_mut(&mut self) -> &mut ExpansionState<NodeId> {
        &mut self.expansion
    }

    /// Table whose schema is loaded
    #[inline]
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn schema(&self) -> &SchemaEditor {
        &self.schema
    }

    /// Schema editor, for row selection
    #[inline]
    pub fn schema_mut(&mut self) -> &mut SchemaEditor {
        &mut self.schema
    }

    /// Current taxonomy snapshot
    #[inline]
    #[must_use]
    pub fn taxonomy(&self) -> Arc<Forest<PolicyTagNode>> {
        self.taxonomy.get()
    }

    #[inline]
    #[must_use]
    pub fn checked(&self) -> &CheckedTags {
        &self.checked
    }

    #[inline]
    pub fn checked_mut(&mut self) -> &mut CheckedTags {
        &mut self.checked
    }

    /// Start a fetch in the current generation
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] after [`close`](Self::close).
    pub fn begin_fetch(&self) -> Result<FetchTicket, SessionError> {
        self.ensure_open()?;
        Ok(FetchTicket {
            generation: self.generation,
        })
    }

    /// Stop accepting fetch results and edits
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.generation += 1;
            tracing::debug!(generation = self.generation, "session closed");
        }
    }

    /// Drop results of fetches still in flight
    ///
    /// Used when a newer fetch supersedes older ones.
    pub fn invalidate_fetches(&mut self) {
        self.generation += 1;
    }

    /// Publish a fetched hierarchy
    pub fn finish_hierarchy(
        &mut self,
        ticket: FetchTicket,
        result: Result<Hierarchy, SourceError>,
    ) -> LoadOutcome {
        let forest = match self.settle(ticket, "hierarchy", result) {
            Ok(forest) => forest,
            Err(outcome) => return outcome,
        };

        if self.config.key_mode == KeyMode::Name {
            if let Err(err) = validate_unique_names(&forest) {
                tracing::warn!(error = %err, "name-keyed hierarchy has duplicates");
                self.notifier.notify(Notification::warning(format!(
                    "{err}; edits by name will affect every match"
                )));
            }
        }

        let dropped = self.expansion.retain_present(&forest);
        let nodes = count(&forest);
        let revision = self.hierarchy.replace(forest);
        tracing::info!(revision, nodes, dropped, "hierarchy loaded");
        LoadOutcome::Loaded { revision }
    }

    /// Publish a fetched schema for `table`
    ///
    /// The row selection is dropped.
    pub fn finish_schema(
        &mut self,
        ticket: FetchTicket,
        table: &str,
        result: Result<Vec<SchemaField>, SourceError>,
    ) -> LoadOutcome {
        let fields = match self.settle(ticket, "schema", result) {
            Ok(fields) => fields,
            Err(outcome) => return outcome,
        };
        let columns = fields.len();
        let revision = self.schema.replace(fields);
        self.table = Some(table.to_string());
        tracing::info!(revision, table, columns, "schema loaded");
        LoadOutcome::Loaded { revision }
    }

    /// Publish a fetched taxonomy
    ///
    /// Checked ids missing from the new taxonomy are unchecked.
    pub fn finish_policy_tags(
        &mut self,
        ticket: FetchTicket,
        result: Result<Forest<PolicyTagNode>, SourceError>,
    ) -> LoadOutcome {
        let taxonomy = match self.settle(ticket, "policy tags", result) {
            Ok(taxonomy) => taxonomy,
            Err(outcome) => return outcome,
        };
        let dropped = self.checked.retain_present(&taxonomy);
        let revision = self.taxonomy.replace(taxonomy);
        tracing::info!(revision, dropped, "policy tags loaded");
        LoadOutcome::Loaded { revision }
    }

    /// Fetch and publish the hierarchy
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] after [`close`](Self::close). Fetch
    /// failures are reported through the notifier, not returned.
    pub async fn load_hierarchy(&mut self, source: &dyn TreeSource) -> Result<LoadOutcome, SessionError> {
        let ticket = self.begin_fetch()?;
        let result = source.fetch_hierarchy().await;
        Ok(self.finish_hierarchy(ticket, result))
    }

    /// Fetch and publish the schema of `table`
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] after [`close`](Self::close).
    pub async fn load_schema(
        &mut self,
        source: &dyn TreeSource,
        table: &str,
    ) -> Result<LoadOutcome, SessionError> {
        let ticket = self.begin_fetch()?;
        let result = source.fetch_schema(table).await;
        Ok(self.finish_schema(ticket, table, result))
    }

    /// Fetch and publish the policy-tag taxonomy
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] after [`close`](Self::close).
    pub async fn load_policy_tags(&mut self, source: &dyn TreeSource) -> Result<LoadOutcome, SessionError> {
        let ticket = self.begin_fetch()?;
        let result = source.fetch_policy_tags().await;
        Ok(self.finish_policy_tags(ticket, result))
    }

    /// Refetch everything this session has loaded
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] after [`close`](Self::close).
    pub async fn refresh(&mut self, source: &dyn TreeSource) -> Result<Vec<LoadOutcome>, SessionError> {
        let mut outcomes = vec![
            self.load_hierarchy(source).await?,
            self.load_policy_tags(source).await?,
        ];
        if let Some(table) = self.table.clone() {
            outcomes.push(self.load_schema(source, &table).await?);
        }
        Ok(outcomes)
    }

    /// Apply a hierarchy edit
    ///
    /// # Errors
    /// Returns [`SessionError::Hierarchy`] when the edit is rejected; the
    /// rejection is also shown as an error notification.
    pub fn edit_hierarchy(&mut self, edit: &HierarchyEdit) -> Result<u64, SessionError> {
        self.ensure_open()?;
        match self.hierarchy.apply(edit) {
            Ok(revision) => {
                tracing::debug!(revision, "hierarchy edited");
                if matches!(edit, HierarchyEdit::Delete { .. }) {
                    let forest = self.hierarchy.get();
                    self.expansion.retain_present(forest.as_slice());
                }
                Ok(revision)
            }
            Err(err) => {
                self.notifier.error(&err);
                Err(err.into())
            }
        }
    }

    /// Rename by display name
    ///
    /// In [`KeyMode::Name`] every node called `name` is renamed; in
    /// [`KeyMode::Id`] only the first pre-order match. A miss publishes
    /// nothing and returns the current revision.
    ///
    /// # Errors
    /// Returns [`SessionError::Hierarchy`] for a blank `new_name`.
    pub fn rename_by_name(&mut self, name: &str, new_name: &str) -> Result<u64, SessionError> {
        self.ensure_open()?;
        let forest = self.hierarchy.get();
        let Some(first) = locate_by_name(forest.as_slice(), name) else {
            return Ok(self.hierarchy.revision());
        };
        match self.config.key_mode {
            KeyMode::Id => {
                let id = first.id;
                self.edit_hierarchy(&HierarchyEdit::Rename {
                    id,
                    name: new_name.to_string(),
                })
            }
            KeyMode::Name => {
                if new_name.trim().is_empty() {
                    let err = HierarchyError::EmptyName;
                    self.notifier.error(&err);
                    return Err(err.into());
                }
                let renamed = update_by_name(forest.as_slice(), name, |n| n.renamed(new_name));
                let revision = self.hierarchy.replace(renamed);
                tracing::debug!(revision, name, new_name, "renamed every match");
                Ok(revision)
            }
        }
    }

    /// Delete by display name
    ///
    /// Same matching rules as [`rename_by_name`](Self::rename_by_name).
    ///
    /// # Errors
    /// Returns [`SessionError::Closed`] after [`close`](Self::close).
    pub fn delete_by_name(&mut self, name: &str) -> Result<u64, SessionError> {
        self.ensure_open()?;
        let forest = self.hierarchy.get();
        let Some(first) = locate_by_name(forest.as_slice(), name) else {
            return Ok(self.hierarchy.revision());
        };
        match self.config.key_mode {
            KeyMode::Id => {
                let id = first.id;
                self.edit_hierarchy(&HierarchyEdit::Delete { id })
            }
            KeyMode::Name => {
                let pruned = delete_by_name(forest.as_slice(), name);
                self.expansion.retain_present(&pruned);
                let revision = self.hierarchy.replace(pruned);
                tracing::debug!(revision, name, "deleted every match");
                Ok(revision)
            }
        }
    }

    /// Apply a schema edit
    ///
    /// # Errors
    /// Returns [`SessionError::Schema`] when the edit is rejected.
    pub fn edit_schema(&mut self, edit: &SchemaEdit) -> Result<u64, SessionError> {
        self.ensure_open()?;
        match self.schema.apply(edit) {
            Ok(revision) => {
                tracing::debug!(revision, "schema edited");
                Ok(revision)
            }
            Err(err) => {
                self.notifier.error(&err);
                Err(err.into())
            }
        }
    }

    /// Apply the checked policy tags to the selected rows
    ///
    /// On success the checked overlay is cleared and a success notification
    /// is shown.
    ///
    /// # Errors
    /// Returns [`SessionError::Schema`] without a selection or on a stale
    /// address.
    pub fn apply_policy_tags(&mut self) -> Result<usize, SessionError> {
        self.ensure_open()?;
        match self.schema.apply_policy_tags(&self.checked) {
            Ok(applied) => {
                self.checked = CheckedTags::new();
                self.notifier
                    .success(format!("Policy tags applied to {applied} field(s)"));
                Ok(applied)
            }
            Err(err) => {
                self.notifier.error(&err);
                Err(err.into())
            }
        }
    }

    /// Submit a tag form and attach the entry to the selected rows
    ///
    /// # Errors
    /// Returns [`SessionError::Form`] for an invalid form, or
    /// [`SessionError::Schema`] without a selection.
    pub fn apply_tag_form(&mut self, form: &FormState) -> Result<usize, SessionError> {
        self.ensure_open()?;
        let tag = match form.submit() {
            Ok(tag) => tag,
            Err(err) => {
                self.notifier.error(&err);
                return Err(err.into());
            }
        };
        let template = tag.tag_template_form_id.clone();
        match self.schema.apply_tag(tag) {
            Ok(applied) => {
                self.notifier
                    .success(format!("Tag {template} applied to {applied} field(s)"));
                Ok(applied)
            }
            Err(err) => {
                self.notifier.error(&err);
                Err(err.into())
            }
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    fn settle<T>(
        &self,
        ticket: FetchTicket,
        what: &'static str,
        result: Result<T, SourceError>,
    ) -> Result<T, LoadOutcome> {
        if ticket.generation != self.generation {
            tracing::debug!(
                what,
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale fetch result"
            );
            return Err(LoadOutcome::Stale);
        }
        result.map_err(|err| {
            tracing::warn!(what, error = %err, "fetch failed");
            self.notifier.error(&err);
            LoadOutcome::Failed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagtree_hierarchy::HierarchyNode;
    use tagtree_notify::Severity;

    fn org() -> Hierarchy {
        vec![Arc::new(
            HierarchyNode::new("Eng", "Engineering").with_child(HierarchyNode::new("Infra", "")),
        )]
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut session = EditingSession::new(TagtreeConfig::default());
        let ticket = session.begin_fetch().unwrap();
        session.invalidate_fetches();

        let outcome = session.finish_hierarchy(ticket, Ok(org()));
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(session.hierarchy().is_empty());
    }

    #[test]
    fn closed_session_refuses_work() {
        let mut session = EditingSession::new(TagtreeConfig::default());
        let ticket = session.begin_fetch().unwrap();
        session.close();

        assert_eq!(session.finish_hierarchy(ticket, Ok(org())), LoadOutcome::Stale);
        assert!(matches!(session.begin_fetch(), Err(SessionError::Closed)));
        assert!(matches!(session.delete_by_name("Eng"), Err(SessionError::Closed)));
    }

    #[test]
    fn failure_keeps_last_good_value() {
        let mut session = EditingSession::new(TagtreeConfig::default());
        let ticket = session.begin_fetch().unwrap();
        assert!(session.finish_hierarchy(ticket, Ok(org())).is_loaded());

        let ticket = session.begin_fetch().unwrap();
        let outcome = session.finish_hierarchy(
            ticket,
            Err(SourceError::Unavailable("connection reset".into())),
        );
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(session.hierarchy()[0].name, "Eng");

        let shown = session.notifier().current().unwrap();
        assert_eq!(shown.status, Severity::Error);
        assert!(shown.msg.contains("connection reset"));
    }

    #[test]
    fn name_mode_warns_on_duplicates() {
        let mut session =
            EditingSession::new(TagtreeConfig::default().with_key_mode(KeyMode::Name));
        let ticket = session.begin_fetch().unwrap();
        let forest = vec![
            Arc::new(HierarchyNode::new("Ops", "")),
            Arc::new(HierarchyNode::new("Ops", "")),
        ];
        assert!(session.finish_hierarchy(ticket, Ok(forest)).is_loaded());
        assert_eq!(session.notifier().current().unwrap().status, Severity::Warning);
    }

    #[test]
    fn rename_miss_publishes_nothing() {
        let mut session = EditingSession::new(TagtreeConfig::default());
        let ticket = session.begin_fetch().unwrap();
        session.finish_hierarchy(ticket, Ok(org()));
        let before = session.hierarchy();
        let revision = session.hierarchy_store().revision();

        assert_eq!(session.rename_by_name("Nope", "X").unwrap(), revision);
        assert!(Arc::ptr_eq(&before, &session.hierarchy()));
    }
}
