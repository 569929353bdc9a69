//! Tracing subscriber setup

use crate::config::{LogFormat, TagtreeConfig};
use crate::error::SessionError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber described by `config`
///
/// Returns `false` when a subscriber was already installed; the existing
/// one is kept.
///
/// # Errors
/// Returns [`SessionError::Config`] if `log_filter` is not a valid directive.
pub fn init(config: &TagtreeConfig) -> Result<bool, SessionError> {
    let filter = EnvFilter::try_new(&config.log_filter).map_err(|e| {
        SessionError::Config(format!("invalid log filter '{}': {e}", config.log_filter))
    })?;

    let installed = match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .is_ok(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .is_ok(),
    };
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_filter() {
        let config = TagtreeConfig::new().with_log_filter("tagtree=loud");
        assert!(matches!(init(&config), Err(SessionError::Config(_))));
    }

    #[test]
    fn second_init_keeps_first() {
        let config = TagtreeConfig::new().with_log_filter("tagtree=debug");
        // Another test may already have installed one; either way the next call is a no-op
        init(&config).unwrap();
        assert!(!init(&config).unwrap());
    }
}
