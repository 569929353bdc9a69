//! Session configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! changes.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use tagtree_notify::DismissPolicy;

/// How hierarchy edits address nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// Stable generated ids; duplicate names never collide
    #[default]
    Id,
    /// Display names; update and delete hit every same-named node
    Name,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Notification timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Auto-dismiss delay for info messages
    pub info_ms: u64,
    /// Auto-dismiss delay for success messages
    pub success_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            info_ms: 6000,
            success_ms: 6000,
        }
    }
}

/// tagtree configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagtreeConfig {
    /// `EnvFilter` directive for the tracing subscriber
    pub log_filter: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Notification timing
    pub notify: NotifyConfig,
    /// Hierarchy addressing
    pub key_mode: KeyMode,
    /// Drop the schema row selection after every apply
    pub clear_selection_on_edit: bool,
}

impl TagtreeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`SessionError::Config`] on malformed TOML or unknown values.
    pub fn from_toml_str(text: &str) -> Result<Self, SessionError> {
        toml::from_str(text).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// With key mode
    #[inline]
    #[must_use]
    pub fn with_key_mode(mut self, key_mode: KeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// With selection clearing after applies
    #[inline]
    #[must_use]
    pub fn with_clear_selection_on_edit(mut self, clear: bool) -> Self {
        self.clear_selection_on_edit = clear;
        self
    }

    /// Dismiss policy derived from the notify section
    #[must_use]
    pub fn dismiss_policy(&self) -> DismissPolicy {
        DismissPolicy::default().with_delays_ms(self.notify.info_ms, self.notify.success_ms)
    }
}

impl Default for TagtreeConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_format: LogFormat::default(),
            notify: NotifyConfig::default(),
            key_mode: KeyMode::default(),
            clear_selection_on_edit: true,
        }
    }
}
