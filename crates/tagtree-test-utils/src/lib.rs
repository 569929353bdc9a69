//! Testing utilities for tagtree workspace
//!
//! Shared fixtures and a scriptable [`TreeSource`].

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tagtree_core::{SourceError, TreeSource};
use tagtree_hierarchy::{Hierarchy, HierarchyNode, NodeId};
use tagtree_schema::{
    FieldMode, FieldStyle, FieldType, FormFieldDef, PolicyTagNode, SchemaField, TagTemplateForm,
};
use tagtree_tree::Forest;

/// `Eng` (with child `Infra`) and `Sales`, plus their ids
#[derive(Debug, Clone)]
pub struct SampleOrg {
    pub forest: Hierarchy,
    pub eng: NodeId,
    pub infra: NodeId,
    pub sales: NodeId,
}

pub fn sample_org() -> SampleOrg {
    let infra = HierarchyNode::new("Infra", "Infra team");
    let eng = HierarchyNode::new("Eng", "Engineering").with_child(infra.clone());
    let sales = HierarchyNode::new("Sales", "Sales team");
    SampleOrg {
        eng: eng.id,
        infra: infra.id,
        sales: sales.id,
        forest: vec![Arc::new(eng), Arc::new(sales)],
    }
}

/// Columns `id`, `email`, `address` (RECORD of `street`, `city`), `orders`
pub fn sample_schema() -> Vec<SchemaField> {
    vec![
        SchemaField::new("id", FieldType::Integer).with_mode(FieldMode::Required),
        SchemaField::new("email", FieldType::String),
        SchemaField::record(
            "address",
            vec![
                SchemaField::new("street", FieldType::String),
                SchemaField::new("city", FieldType::String),
            ],
        ),
        SchemaField::new("orders", FieldType::Integer).with_mode(FieldMode::Repeated),
    ]
}

/// `PII` (with `Email`, `Phone`) and `Financial`
pub fn sample_taxonomy() -> Forest<PolicyTagNode> {
    vec![
        Arc::new(
            PolicyTagNode::new("tags/pii", "PII")
                .with_sub_tag(PolicyTagNode::new("tags/pii/email", "Email"))
                .with_sub_tag(PolicyTagNode::new("tags/pii/phone", "Phone")),
        ),
        Arc::new(PolicyTagNode::new("tags/financial", "Financial")),
    ]
}

/// Template with a required `owner` text field and a `sensitivity` select
pub fn sample_template() -> TagTemplateForm {
    TagTemplateForm {
        id: "data_governance".to_string(),
        display_name: "Data governance".to_string(),
        fields: vec![
            FormFieldDef::new("owner", "Owner").required(),
            FormFieldDef::new("sensitivity", "Sensitivity")
                .with_style(FieldStyle::Select)
                .with_options(vec!["low".into(), "high".into()]),
        ],
    }
}

/// In-memory source whose responses can be swapped mid-test
///
/// A missing tree answers [`SourceError::NotFound`]; while an outage is set
/// every fetch answers [`SourceError::Unavailable`].
#[derive(Debug, Default)]
pub struct MockSource {
    hierarchy: Mutex<Option<Hierarchy>>,
    schema: Mutex<Option<Vec<SchemaField>>>,
    policy_tags: Mutex<Option<Forest<PolicyTagNode>>>,
    outage: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serving every sample fixture; schema answers for any table
    pub fn with_samples() -> Self {
        let source = Self::new();
        source.set_hierarchy(sample_org().forest);
        source.set_schema(sample_schema());
        source.set_policy_tags(sample_taxonomy());
        source
    }

    pub fn set_hierarchy(&self, forest: Hierarchy) {
        *self.hierarchy.lock() = Some(forest);
    }

    pub fn set_schema(&self, fields: Vec<SchemaField>) {
        *self.schema.lock() = Some(fields);
    }

    pub fn set_policy_tags(&self, taxonomy: Forest<PolicyTagNode>) {
        *self.policy_tags.lock() = Some(taxonomy);
    }

    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.outage.lock() = Some(reason.into());
    }

    pub fn recover(&self) {
        *self.outage.lock() = None;
    }

    /// Number of fetches served, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve<T: Clone>(&self, slot: &Mutex<Option<T>>, what: &str) -> Result<T, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.outage.lock().clone() {
            return Err(SourceError::Unavailable(reason));
        }
        slot.lock()
            .clone()
            .ok_or_else(|| SourceError::NotFound(what.to_string()))
    }
}

#[async_trait]
impl TreeSource for MockSource {
    async fn fetch_hierarchy(&self) -> Result<Hierarchy, SourceError> {
        self.serve(&self.hierarchy, "hierarchy")
    }

    async fn fetch_schema(&self, table: &str) -> Result<Vec<SchemaField>, SourceError> {
        self.serve(&self.schema, table)
    }

    async fn fetch_policy_tags(&self) -> Result<Forest<PolicyTagNode>, SourceError> {
        self.serve(&self.policy_tags, "policy tags")
    }
}
