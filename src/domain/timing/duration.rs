//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default pause between clipboard open attempts (10 milliseconds)
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 10;

/// Default total budget for clipboard open attempts (500 milliseconds)
pub const DEFAULT_RETRY_DEADLINE_MS: u64 = 500;

/// Value object representing a short time span with millisecond resolution.
/// Immutable and validated on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default retry interval
    pub const fn default_retry_interval() -> Self {
        Self::from_millis(DEFAULT_RETRY_INTERVAL_MS)
    }

    /// Default retry deadline
    pub const fn default_retry_deadline() -> Self {
        Self::from_millis(DEFAULT_RETRY_DEADLINE_MS)
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported formats: "250ms", "1s", "1s500ms", "2m"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let invalid = || DurationParseError { input: s.to_string() };

        let mut total_ms: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;
        let mut chars = input.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
                continue;
            }
            if current_num.is_empty() {
                return Err(invalid());
            }
            let value: u64 = current_num.parse().map_err(|_| invalid())?;
            let unit_ms = match ch {
                'm' if chars.peek() == Some(&'s') => {
                    chars.next();
                    1
                }
                'm' => 60_000,
                's' => 1000,
                _ => return Err(invalid()),
            };
            total_ms = value
                .checked_mul(unit_ms)
                .and_then(|ms| total_ms.checked_add(ms))
                .ok_or_else(invalid)?;
            current_num.clear();
            found_any = true;
        }

        // Leftover digits without a unit
        if !current_num.is_empty() || !found_any {
            return Err(invalid());
        }

        Ok(Self {
            milliseconds: total_ms,
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.milliseconds / 1000;
        let millis = self.milliseconds % 1000;

        match (secs, millis) {
            (0, ms) => write!(f, "{}ms", ms),
            (s, 0) => write!(f, "{}s", s),
            (s, ms) => write!(f, "{}s{}ms", s, ms),
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_retry_deadline()
    }
}
