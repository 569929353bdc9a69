//! Table schema fields
//!
//! Mirrors the BigQuery table schema JSON served by the catalog backend,
//! extended with tag-template attachments and policy tags.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tagtree_tree::Nested;

/// Column type
///
/// Unknown type names round-trip through [`FieldType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Bytes,
    Integer,
    Int64,
    Float,
    Float64,
    Numeric,
    BigNumeric,
    Boolean,
    Bool,
    Timestamp,
    Date,
    Time,
    Datetime,
    Geography,
    Json,
    Record,
    Struct,
    Other(String),
}

impl FieldType {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "STRING",
            Self::Bytes => "BYTES",
            Self::Integer => "INTEGER",
            Self::Int64 => "INT64",
            Self::Float => "FLOAT",
            Self::Float64 => "FLOAT64",
            Self::Numeric => "NUMERIC",
            Self::BigNumeric => "BIGNUMERIC",
            Self::Boolean => "BOOLEAN",
            Self::Bool => "BOOL",
            Self::Timestamp => "TIMESTAMP",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Datetime => "DATETIME",
            Self::Geography => "GEOGRAPHY",
            Self::Json => "JSON",
            Self::Record => "RECORD",
            Self::Struct => "STRUCT",
            Self::Other(name) => name,
        }
    }

    /// Whether fields of this type carry nested fields
    #[inline]
    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record | Self::Struct)
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "STRING" => Self::String,
            "BYTES" => Self::Bytes,
            "INTEGER" => Self::Integer,
            "INT64" => Self::Int64,
            "FLOAT" => Self::Float,
            "FLOAT64" => Self::Float64,
            "NUMERIC" => Self::Numeric,
            "BIGNUMERIC" => Self::BigNumeric,
            "BOOLEAN" => Self::Boolean,
            "BOOL" => Self::Bool,
            "TIMESTAMP" => Self::Timestamp,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::Datetime,
            "GEOGRAPHY" => Self::Geography,
            "JSON" => Self::Json,
            "RECORD" => Self::Record,
            "STRUCT" => Self::Struct,
            _ => Self::Other(name),
        }
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        match ty {
            FieldType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldMode {
    Required,
    #[default]
    Nullable,
    Repeated,
}

/// Tag-template payload attached to a field
///
/// `data` is free-form: its keys are the field ids of the template form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TagAttachment {
    pub tag_template_form_id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl TagAttachment {
    /// Create attachment for a template
    #[must_use]
    pub fn new(tag_template_form_id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            tag_template_form_id: tag_template_form_id.into(),
            data,
        }
    }
}

/// Policy tags attached to a field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyTags {
    #[serde(default)]
    pub names: Vec<String>,
}

/// One column, possibly a nested record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub mode: FieldMode,
    #[serde(default)]
    pub description: String,
    /// Nested fields, only for record types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SchemaField>,
    #[serde(default)]
    pub tags: Vec<TagAttachment>,
    #[serde(default, rename = "policyTags")]
    pub policy_tags: PolicyTags,
}

impl SchemaField {
    /// Scalar field with no tags
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            mode: FieldMode::default(),
            description: String::new(),
            fields: Vec::new(),
            tags: Vec::new(),
            policy_tags: PolicyTags::default(),
        }
    }

    /// Record field holding `fields`
    #[must_use]
    pub fn record(name: impl Into<String>, fields: Vec<SchemaField>) -> Self {
        Self {
            fields,
            ..Self::new(name, FieldType::Record)
        }
    }

    /// With mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: FieldMode) -> Self {
        self.mode = mode;
        self
    }

    /// Tag attached for `template_id`, if any
    #[must_use]
    pub fn tag(&self, template_id: &str) -> Option<&TagAttachment> {
        self.tags
            .iter()
            .find(|t| t.tag_template_form_id == template_id)
    }

    /// Attach a tag, replacing an existing one for the same template
    pub fn attach_tag(&mut self, tag: TagAttachment) {
        match self
            .tags
            .iter_mut()
            .find(|t| t.tag_template_form_id == tag.tag_template_form_id)
        {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    /// Remove the tag for `template_id`, returning whether one existed
    pub fn remove_tag(&mut self, template_id: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.tag_template_form_id != template_id);
        self.tags.len() != before
    }

    /// Add a policy tag once, returning whether it was new
    pub fn add_policy_tag(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.policy_tags.names.contains(&id) {
            return false;
        }
        self.policy_tags.names.push(id);
        true
    }

    /// Remove a policy tag, returning whether it was present
    pub fn remove_policy_tag(&mut self, id: &str) -> bool {
        let before = self.policy_tags.names.len();
        self.policy_tags.names.retain(|n| n != id);
        self.policy_tags.names.len() != before
    }
}

impl Nested for SchemaField {
    fn nested(&self) -> &[Self] {
        &self.fields
    }

    fn nested_mut(&mut self) -> &mut [Self] {
        &mut self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_backend_schema() {
        let value = json!([
            {"name": "id", "type": "STRING", "mode": "REQUIRED"},
            {"name": "address", "type": "RECORD", "mode": "NULLABLE", "fields": [
                {"name": "city", "type": "STRING"}
            ], "policyTags": {"names": ["projects/p/taxonomies/1/policyTags/2"]}}
        ]);
        let fields: Vec<SchemaField> = serde_json::from_value(value).unwrap();
        assert_eq!(fields[0].mode, FieldMode::Required);
        assert!(fields[1].field_type.is_record());
        assert_eq!(fields[1].fields[0].mode, FieldMode::Nullable);
        assert_eq!(fields[1].policy_tags.names.len(), 1);
    }

    #[test]
    fn unknown_type_round_trips() {
        let field: SchemaField =
            serde_json::from_value(json!({"name": "r", "type": "RANGE"})).unwrap();
        assert_eq!(field.field_type, FieldType::Other("RANGE".into()));
        let back = serde_json::to_value(&field).unwrap();
        assert_eq!(back["type"], "RANGE");
        assert_eq!(back["policyTags"], json!({"names": []}));
        assert!(back.get("fields").is_none());
    }

    #[test]
    fn attach_tag_replaces_same_template() {
        let mut field = SchemaField::new("email", FieldType::String);
        let mut data = Map::new();
        data.insert("owner".into(), json!("a"));
        field.attach_tag(TagAttachment::new("pii", data.clone()));
        data.insert("owner".into(), json!("b"));
        field.attach_tag(TagAttachment::new("pii", data));
        field.attach_tag(TagAttachment::new("quality", Map::new()));

        assert_eq!(field.tags.len(), 2);
        assert_eq!(field.tag("pii").unwrap().data["owner"], "b");
        assert!(field.remove_tag("pii"));
        assert!(!field.remove_tag("pii"));
    }

    #[test]
    fn policy_tags_deduplicate() {
        let mut field = SchemaField::new("ssn", FieldType::String);
        assert!(field.add_policy_tag("t1"));
        assert!(!field.add_policy_tag("t1"));
        assert!(field.remove_policy_tag("t1"));
        assert!(field.policy_tags.names.is_empty());
    }
}
