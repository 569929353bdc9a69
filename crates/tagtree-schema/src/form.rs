//! Tag-template forms
//!
//! The backend describes each tag template as a list of field definitions.
//! [`FormState`] is the registration/control object handed to the renderer:
//! controls register themselves, report value changes, and `submit` turns
//! the collected values into a [`TagAttachment`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::field::TagAttachment;

/// Input style requested by the template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStyle {
    #[default]
    Text,
    Textarea,
    Number,
    Select,
    Multiselect,
    Checkbox,
    Date,
    Datetime,
    #[serde(other)]
    Unknown,
}

/// Concrete control the renderer should mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    TextInput,
    TextArea,
    NumberInput,
    Dropdown,
    MultiDropdown,
    Toggle,
    DatePicker,
    DateTimePicker,
}

impl FieldStyle {
    /// Control for this style; unknown styles fall back to a text input
    #[must_use]
    pub fn control(self) -> ControlKind {
        match self {
            Self::Text | Self::Unknown => ControlKind::TextInput,
            Self::Textarea => ControlKind::TextArea,
            Self::Number => ControlKind::NumberInput,
            Self::Select => ControlKind::Dropdown,
            Self::Multiselect => ControlKind::MultiDropdown,
            Self::Checkbox => ControlKind::Toggle,
            Self::Date => ControlKind::DatePicker,
            Self::Datetime => ControlKind::DateTimePicker,
        }
    }
}

/// One field of a tag-template form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormFieldDef {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub style: FieldStyle,
    /// Allowed values for select styles
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl FormFieldDef {
    /// Text field
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            style: FieldStyle::Text,
            options: Vec::new(),
            default: None,
            required: false,
            description: None,
        }
    }

    /// With style
    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.style = style;
        self
    }

    /// With options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    /// Mark required
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// With default value
    #[inline]
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A tag template: the form governing one kind of tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagTemplateForm {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    pub fields: Vec<FormFieldDef>,
}

#[derive(Debug, Clone)]
struct Control {
    def: FormFieldDef,
    disabled: bool,
    value: Option<Value>,
}

/// Registration/control object for one form instance
#[derive(Debug, Clone)]
pub struct FormState {
    template_id: String,
    controls: IndexMap<String, Control>,
}

impl FormState {
    /// Empty form for `template_id`
    #[must_use]
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            controls: IndexMap::new(),
        }
    }

    /// Register every field of a template, seeding values from `existing`
    #[must_use]
    pub fn for_template(template: &TagTemplateForm, existing: Option<&TagAttachment>, disabled: bool) -> Self {
        let mut state = Self::new(template.id.clone());
        for def in &template.fields {
            state.register(def.clone(), disabled);
        }
        if let Some(tag) = existing {
            for (id, value) in &tag.data {
                if let Some(control) = state.controls.get_mut(id) {
                    control.value = Some(value.clone());
                }
            }
        }
        state
    }

    /// Register a control, returning the kind the renderer should mount
    pub fn register(&mut self, def: FormFieldDef, disabled: bool) -> ControlKind {
        let kind = def.style.control();
        let value = def.default.clone();
        self.controls.insert(
            def.id.clone(),
            Control {
                def,
                disabled,
                value,
            },
        );
        kind
    }

    /// Record a value change reported by a control
    ///
    /// # Errors
    /// Returns error if the control is unknown or disabled.
    pub fn set_value(&mut self, id: &str, value: Value) -> Result<(), FormError> {
        let control = self
            .controls
            .get_mut(id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))?;
        if control.disabled {
            return Err(FormError::Disabled(id.to_string()));
        }
        control.value = Some(value);
        Ok(())
    }

    /// Current value of a control
    #[must_use]
    pub fn value(&self, id: &str) -> Option<&Value> {
        self.controls.get(id).and_then(|c| c.value.as_ref())
    }

    /// Validate and produce the tag payload
    ///
    /// # Errors
    /// Returns the first missing required field or out-of-options value.
    pub fn submit(&self) -> Result<TagAttachment, FormError> {
        let mut data = Map::new();
        for (id, control) in &self.controls {
            match &control.value {
                Some(value) if !is_blank(value) => {
                    check_options(&control.def, value)?;
                    data.insert(id.clone(), value.clone());
                }
                _ if control.def.required => {
                    return Err(FormError::Required(control.def.label.clone()));
                }
                _ => {}
            }
        }
        Ok(TagAttachment::new(self.template_id.clone(), data))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn check_options(def: &FormFieldDef, value: &Value) -> Result<(), FormError> {
    if def.options.is_empty() {
        return Ok(());
    }
    let allowed = |v: &Value| v.as_str().is_some_and(|s| def.options.iter().any(|o| o == s));
    let ok = match (def.style, value) {
        (FieldStyle::Multiselect, Value::Array(items)) => items.iter().all(allowed),
        (FieldStyle::Select, v) => allowed(v),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(FormError::NotAnOption {
            field: def.label.clone(),
            value: value.to_string(),
        })
    }
}

/// Form errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Required field left empty
    #[error("{0} is required")]
    Required(String),

    /// Value reported for a control that was never registered
    #[error("unknown form field: {0}")]
    UnknownField(String),

    /// Value reported for a disabled control
    #[error("form field is disabled: {0}")]
    Disabled(String),

    /// Select value outside the declared options
    #[error("{value} is not an option for {field}")]
    NotAnOption { field: String, value: String },
}
