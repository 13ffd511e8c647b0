//! Timing domain module

mod duration;
mod retry;

pub use duration::{Duration, DEFAULT_RETRY_DEADLINE_MS, DEFAULT_RETRY_INTERVAL_MS};
pub use retry::{Backoff, RetryPolicy};
