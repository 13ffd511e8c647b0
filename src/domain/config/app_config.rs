//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::timing::{Backoff, Duration, RetryPolicy};

/// Default bound for registered format names, in UTF-16 units
pub const DEFAULT_MAX_NAME_LEN: usize = 256;

/// Clipboard gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    pub retry_interval: Option<String>,
    pub retry_deadline: Option<String>,
    pub backoff: Option<String>,
}

/// Format catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub max_name_len: Option<usize>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub gate: Option<GateConfig>,
    pub catalog: Option<CatalogConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            gate: Some(GateConfig {
                retry_interval: Some(Duration::default_retry_interval().to_string()),
                retry_deadline: Some(Duration::default_retry_deadline().to_string()),
                backoff: Some(Backoff::default().to_string()),
            }),
            catalog: Some(CatalogConfig {
                max_name_len: Some(DEFAULT_MAX_NAME_LEN),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            gate: Self::merge_gate_config(self.gate, other.gate),
            catalog: match (self.catalog, other.catalog) {
                (Some(b), Some(o)) => Some(CatalogConfig {
                    max_name_len: o.max_name_len.or(b.max_name_len),
                }),
                (b, o) => o.or(b),
            },
        }
    }

    /// Merge gate config sections
    fn merge_gate_config(base: Option<GateConfig>, other: Option<GateConfig>) -> Option<GateConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(GateConfig {
                retry_interval: o.retry_interval.or(b.retry_interval),
                retry_deadline: o.retry_deadline.or(b.retry_deadline),
                backoff: o.backoff.or(b.backoff),
            }),
        }
    }

    /// Get retry interval, or default if not set/invalid
    pub fn retry_interval_or_default(&self) -> Duration {
        self.gate
            .as_ref()
            .and_then(|g| g.retry_interval.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_retry_interval)
    }

    /// Get retry deadline, or default if not set/invalid
    pub fn retry_deadline_or_default(&self) -> Duration {
        self.gate
            .as_ref()
            .and_then(|g| g.retry_deadline.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_retry_deadline)
    }

    /// Get backoff strategy, or linear if not set/invalid
    pub fn backoff_or_default(&self) -> Backoff {
        self.gate
            .as_ref()
            .and_then(|g| g.backoff.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Build the gate retry policy from the configured values
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_interval_or_default(),
            self.retry_deadline_or_default(),
            self.backoff_or_default(),
        )
    }

    /// Get the registered-name buffer bound, or 256 if not set or zero
    pub fn max_name_len_or_default(&self) -> usize {
        self.catalog
            .as_ref()
            .and_then(|c| c.max_name_len)
            .filter(|&len| len > 0)
            .unwrap_or(DEFAULT_MAX_NAME_LEN)
    }
}
