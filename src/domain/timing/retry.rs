//! Retry policy for opening the clipboard

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::InvalidBackoffError;

use super::duration::Duration;

/// How the pause between attempts grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backoff {
    /// Same pause after every failed attempt
    Fixed,
    /// Pause grows by one interval per failed attempt
    #[default]
    Linear,
}

impl Backoff {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Linear => "linear",
        }
    }
}

impl FromStr for Backoff {
    type Err = InvalidBackoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "linear" => Ok(Self::Linear),
            _ => Err(InvalidBackoffError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bounded retry policy applied while another holder owns the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    interval: Duration,
    deadline: Duration,
    backoff: Backoff,
}

impl RetryPolicy {
    pub const fn new(interval: Duration, deadline: Duration, backoff: Backoff) -> Self {
        Self {
            interval,
            deadline,
            backoff,
        }
    }

    /// Single attempt, no waiting
    pub const fn no_retry() -> Self {
        Self::new(Duration::from_millis(0), Duration::from_millis(0), Backoff::Fixed)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Pause after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> StdDuration {
        let base = self.interval.as_std();
        match self.backoff {
            Backoff::Fixed => base,
            Backoff::Linear => base.saturating_mul(attempt.max(1)),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            Duration::default_retry_interval(),
            Duration::default_retry_deadline(),
            Backoff::default(),
        )
    }
}
