//! Application layer - Clipboard coordination and port interfaces
//!
//! Contains the access discipline, catalog, snapshot, change monitor and
//! text fast path, plus the trait definitions for platform collaborators.

pub mod catalog;
pub mod gate;
pub mod monitor;
pub mod ports;
pub mod quick_text;
pub mod snapshot;

pub use catalog::{Enumeration, FormatCatalog};
pub use gate::{AccessGate, CancelFlag, ScopedAccess};
pub use monitor::{ChangeMonitor, MonitorError, Subscription};
pub use quick_text::QuickTextAccess;
pub use snapshot::ContentSnapshot;
