//! Domain error types

use std::time::Duration as StdDuration;

use thiserror::Error;

use crate::domain::content::{Generation, WindowId};

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>ms, <number>s, <number>m or a combination (e.g., 250ms, 1s, 1s500ms)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an invalid backoff strategy is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid backoff: \"{input}\". Valid strategies are: fixed, linear")]
pub struct InvalidBackoffError {
    pub input: String,
}

/// Errors surfaced by clipboard access, enumeration and materialization.
///
/// `ResourceBusy` and `Stale` are expected in a multi-process clipboard and
/// should be treated as "try again" by callers. `FormatNotPresent` is a normal
/// negative result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("Clipboard is busy (gave up after {} ms)", waited.as_millis())]
    ResourceBusy { waited: StdDuration },

    #[error("Owner window {0} is not a live window")]
    InvalidOwner(WindowId),

    #[error("Format not present on the clipboard: {0}")]
    FormatNotPresent(String),

    #[error("Clipboard changed since capture (generation {captured} -> {observed})")]
    Stale {
        captured: Generation,
        observed: Generation,
    },

    #[error("Clipboard subsystem unavailable: {0}")]
    Fatal(String),

    #[error("Clipboard access is already held by this thread")]
    Reentrant,

    #[error("Clipboard access was cancelled")]
    Cancelled,

    #[error("Clipboard operation failed: {0}")]
    Backend(String),
}

impl ClipboardError {
    /// Whether the caller may reasonably retry the operation later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ResourceBusy { .. } | Self::Stale { .. })
    }

    /// Whether this is an ordinary negative answer rather than a failure
    pub fn is_negative_result(&self) -> bool {
        matches!(self, Self::FormatNotPresent(_))
    }
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_and_stale_are_retryable() {
        let busy = ClipboardError::ResourceBusy {
            waited: StdDuration::from_millis(500),
        };
        let stale = ClipboardError::Stale {
            captured: Generation::new(1),
            observed: Generation::new(2),
        };
        assert!(busy.is_retryable());
        assert!(stale.is_retryable());
        assert!(!ClipboardError::Fatal("gone".into()).is_retryable());
        assert!(!ClipboardError::Reentrant.is_retryable());
    }

    #[test]
    fn format_not_present_is_negative_result() {
        let err = ClipboardError::FormatNotPresent("CF_BITMAP".into());
        assert!(err.is_negative_result());
        assert!(!err.is_retryable());
    }

    #[test]
    fn error_messages_carry_context() {
        let busy = ClipboardError::ResourceBusy {
            waited: StdDuration::from_millis(500),
        };
        assert!(busy.to_string().contains("500 ms"));

        let stale = ClipboardError::Stale {
            captured: Generation::new(7),
            observed: Generation::new(9),
        };
        let msg = stale.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('9'));
    }
}
