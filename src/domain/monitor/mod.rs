//! Change monitor domain module

mod lifecycle;

pub use lifecycle::{InvalidStateTransition, MonitorLifecycle, MonitorState};

/// Content-free "the clipboard changed" signal.
/// Consumers take a fresh snapshot instead of trusting event data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeNotification;
