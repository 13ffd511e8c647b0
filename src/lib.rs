//! clipgate - coordinated access to the shared system clipboard
//!
//! The OS clipboard is a single lock shared by every process, holding a
//! list of formats that any process may replace at any moment. This crate
//! wraps it in a small set of components:
//!
//! - [`AccessGate`](application::AccessGate): exclusive, time-bounded access with bounded retry
//! - [`FormatCatalog`](application::FormatCatalog): ordered format enumeration
//! - [`ContentSnapshot`](application::ContentSnapshot): versioned, lazily materialized content
//! - [`ChangeMonitor`](application::ChangeMonitor): shared change notifications
//! - [`QuickTextAccess`](application::QuickTextAccess): plain-text fast path
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the monitor lifecycle, configuration and errors
//! - **Application**: The components above and their port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (Win32, in-memory, arboard, XDG config)
//! - **CLI**: Command-line interface, argument parsing and logging setup

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
