//! Domain layer - Core clipboard concepts
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on the platform.

pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod monitor;
pub mod timing;

// Re-export common types
pub use config::AppConfig;
pub use content::{Freshness, Generation, Payload, PayloadCell, WindowId};
pub use error::*;
pub use format::{FormatDescriptor, FormatId, FormatKind, StandardFormat};
pub use monitor::{ChangeNotification, MonitorLifecycle, MonitorState};
pub use timing::{Backoff, Duration, RetryPolicy};
