//! Backend access
//!
//! Sessions fetch through [`TreeSource`] and never see transport details.

use crate::error::SourceError;
use async_trait::async_trait;
use std::collections::HashMap;
use tagtree_hierarchy::Hierarchy;
use tagtree_schema::{PolicyTagNode, SchemaField};
use tagtree_tree::Forest;

/// Source of the trees a session edits
#[async_trait]
pub trait TreeSource: Send + Sync {
    /// Department hierarchy
    async fn fetch_hierarchy(&self) -> Result<Hierarchy, SourceError>;

    /// Column schema of `table`
    async fn fetch_schema(&self, table: &str) -> Result<Vec<SchemaField>, SourceError>;

    /// Policy-tag taxonomy
    async fn fetch_policy_tags(&self) -> Result<Forest<PolicyTagNode>, SourceError>;
}

/// Source serving raw JSON bodies
///
/// Bodies are decoded on every fetch, so a malformed payload surfaces as
/// [`SourceError::Decode`] exactly where an HTTP-backed source would.
#[derive(Debug, Clone, Default)]
pub struct JsonSource {
    hierarchy: Option<String>,
    schemas: HashMap<String, String>,
    policy_tags: Option<String>,
}

impl JsonSource {
    /// Empty source; every fetch fails with [`SourceError::NotFound`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With hierarchy body
    #[must_use]
    pub fn with_hierarchy(mut self, body: impl Into<String>) -> Self {
        self.hierarchy = Some(body.into());
        self
    }

    /// With schema body for `table`
    #[must_use]
    pub fn with_schema(mut self, table: impl Into<String>, body: impl Into<String>) -> Self {
        self.schemas.insert(table.into(), body.into());
        self
    }

    /// With policy-tag taxonomy body
    #[must_use]
    pub fn with_policy_tags(mut self, body: impl Into<String>) -> Self {
        self.policy_tags = Some(body.into());
        self
    }
}

#[async_trait]
impl TreeSource for JsonSource {
    async fn fetch_hierarchy(&self) -> Result<Hierarchy, SourceError> {
        let body = self
            .hierarchy
            .as_deref()
            .ok_or_else(|| SourceError::NotFound("hierarchy".to_string()))?;
        Ok(serde_json::from_str(body)?)
    }

    async fn fetch_schema(&self, table: &str) -> Result<Vec<SchemaField>, SourceError> {
        let body = self
            .schemas
            .get(table)
            .ok_or_else(|| SourceError::NotFound(format!("schema for {table}")))?;
        Ok(serde_json::from_str(body)?)
    }

    async fn fetch_policy_tags(&self) -> Result<Forest<PolicyTagNode>, SourceError> {
        let body = self
            .policy_tags
            .as_deref()
            .ok_or_else(|| SourceError::NotFound("policy tags".to_string()))?;
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn decodes_hierarchy_without_ids() {
        let source = JsonSource::new().with_hierarchy(
            r#"[{"name":"Eng","description":"Engineering","children":[{"name":"Infra"}]}]"#,
        );
        let forest = source.fetch_hierarchy().await.unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children[0].name, "Infra");
        assert_ne!(forest[0].id, forest[0].children[0].id);
    }

    #[tokio::test]
    async fn missing_and_malformed_bodies() {
        let source = JsonSource::new().with_schema("orders", "{not json");
        assert!(matches!(
            source.fetch_schema("orders").await,
            Err(SourceError::Decode(_))
        ));
        assert!(matches!(
            source.fetch_schema("users").await,
            Err(SourceError::NotFound(_))
        ));
        assert!(matches!(
            source.fetch_policy_tags().await,
            Err(SourceError::NotFound(_))
        ));
    }
}
