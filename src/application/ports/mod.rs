//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod backend;
pub mod clipboard;
pub mod config;
pub mod host;

// Re-export common types
pub use backend::{BackendError, ClipboardBackend, Held};
pub use clipboard::TextClipboard;
pub use config::ConfigStore;
pub use host::{ChangeSink, HostError, NotificationHost};
