//! Notification host port interface

use std::sync::Arc;

use thiserror::Error;

use crate::domain::content::WindowId;

/// Callback invoked on the message-pump thread for every native
/// "clipboard changed" signal.
pub type ChangeSink = Arc<dyn Fn() + Send + Sync>;

/// Notification host errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Failed to create notification window: {0}")]
    WindowCreation(String),

    #[error("Failed to register clipboard listener: {0}")]
    Registration(String),

    #[error("Message pump unavailable: {0}")]
    Unavailable(String),
}

/// Port for the window / message-pump collaborator.
///
/// The host owns the message-only window and pumps its messages; the change
/// monitor only decides when the window and the listener exist.
pub trait NotificationHost: Send + Sync {
    /// Create a message-only window whose change signals go to `sink`
    fn create_window(&self, sink: ChangeSink) -> Result<WindowId, HostError>;

    /// Register the clipboard listener against `window`
    fn register_listener(&self, window: WindowId) -> Result<(), HostError>;

    /// Remove the listener registered against `window`
    fn unregister_listener(&self, window: WindowId);

    /// Destroy `window` and release its sink
    fn destroy_window(&self, window: WindowId);
}
