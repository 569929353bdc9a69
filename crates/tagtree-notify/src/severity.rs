//! Notification severities and their dismiss timing

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Severity of a notification
///
/// Serialized as the numeric status code the portal views pass around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    /// `0`: informational, auto-dismissed
    Info,
    /// `1`: warning, sticky
    Warning,
    /// `2`: success, auto-dismissed
    Success,
    /// `3`: error, sticky
    Error,
}

impl Severity {
    /// Numeric status code
    #[inline]
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Info => 0,
            Self::Warning => 1,
            Self::Success => 2,
            Self::Error => 3,
        }
    }

    /// Whether this severity stays until replaced or dismissed
    #[inline]
    #[must_use]
    pub fn is_sticky(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

impl TryFrom<u8> for Severity {
    type Error = UnknownStatus;

    fn try_from(code: u8) -> Result<Self, UnknownStatus> {
        match code {
            0 => Ok(Severity::Info),
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Success),
            3 => Ok(Severity::Error),
            other => Err(UnknownStatus(other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.code()
    }
}

/// Status code outside `0..=3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification status: {0}")]
pub struct UnknownStatus(pub u8);

/// Auto-dismiss delay per severity; `None` means sticky
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissPolicy {
    pub info: Option<Duration>,
    pub warning: Option<Duration>,
    pub success: Option<Duration>,
    pub error: Option<Duration>,
}

impl DismissPolicy {
    /// Default auto-dismiss delay for info and success
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(6000);

    /// Delay for `severity`
    #[inline]
    #[must_use]
    pub fn delay(&self, severity: Severity) -> Option<Duration> {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Success => self.success,
            Severity::Error => self.error,
        }
    }

    /// With info/success delays in milliseconds
    #[inline]
    #[must_use]
    pub fn with_delays_ms(mut self, info_ms: u64, success_ms: u64) -> Self {
        self.info = Some(Duration::from_millis(info_ms));
        self.success = Some(Duration::from_millis(success_ms));
        self
    }
}

impl Default for DismissPolicy {
    fn default() -> Self {
        Self {
            info: Some(Self::DEFAULT_DELAY),
            warning: None,
            success: Some(Self::DEFAULT_DELAY),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 0..=3u8 {
            let severity = Severity::try_from(code).unwrap();
            assert_eq!(severity.code(), code);
        }
        assert_eq!(Severity::try_from(4), Err(UnknownStatus(4)));
    }

    #[test]
    fn default_policy_matches_severity_table() {
        let policy = DismissPolicy::default();
        assert_eq!(policy.delay(Severity::Info), Some(Duration::from_millis(6000)));
        assert_eq!(policy.delay(Severity::Warning), None);
        assert_eq!(policy.delay(Severity::Success), Some(Duration::from_millis(6000)));
        assert_eq!(policy.delay(Severity::Error), None);
        assert!(Severity::Error.is_sticky());
        assert!(!Severity::Success.is_sticky());
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "3");
        let parsed: Severity = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Severity::Success);
        assert!(serde_json::from_str::<Severity>("9").is_err());
    }
}
