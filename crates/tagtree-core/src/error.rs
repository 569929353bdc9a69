//! Error types for tagtree sessions
//!
//! Lookup misses are never errors. What remains:
//! - Backend fetch failures
//! - Rejected hierarchy or schema edits (blank names, stale addresses)
//! - Invalid tag forms
//! - Configuration problems

use tagtree_hierarchy::HierarchyError;
use tagtree_schema::{FormError, SchemaError};

/// Backend fetch errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Backend unreachable
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with an error status
    #[error("backend returned {code}: {message}")]
    Status { code: u16, message: String },

    /// Payload did not match the expected shape
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Resource does not exist
    #[error("not found: {0}")]
    NotFound(String),
}

/// Main session error type
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Fetch failed
    #[error("fetch failed: {0}")]
    Source(#[from] SourceError),

    /// Hierarchy edit rejected
    #[error("hierarchy edit rejected: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// Schema edit rejected
    #[error("schema edit rejected: {0}")]
    Schema(#[from] SchemaError),

    /// Tag form invalid
    #[error("invalid tag form: {0}")]
    Form(#[from] FormError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Session already closed
    #[error("session closed")]
    Closed,
}

impl SessionError {
    /// Whether the error came from the backend rather than the user's edit
    #[inline]
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_display() {
        let err = SourceError::Status {
            code: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned 503: maintenance");
    }

    #[test]
    fn session_error_from_conversions() {
        let err: SessionError = HierarchyError::EmptyName.into();
        assert!(err.to_string().contains("must not be empty"));
        assert!(!err.is_upstream());

        let err: SessionError = SourceError::Unavailable("timeout".into()).into();
        assert!(err.is_upstream());
    }
}
