//! Clipboard backend port interface
//!
//! The primitives every platform clipboard offers. Methods that the OS only
//! allows while the clipboard is open take a [`Held`] proof, which only
//! [`AccessGate`](crate::application::AccessGate) can create.

use std::time::Duration as StdDuration;

use thiserror::Error;

use crate::domain::content::{Generation, WindowId};
use crate::domain::error::ClipboardError;
use crate::domain::format::FormatId;

/// Proof that the clipboard is currently open on this thread
#[derive(Debug)]
pub struct Held {
    _private: (),
}

impl Held {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

/// Backend primitive errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Clipboard is held by another window")]
    Busy,

    #[error("Owner window is not a live window")]
    InvalidOwner,

    #[error("Format is not available")]
    NotPresent,

    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Failed(String),
}

impl BackendError {
    /// Map into the subsystem error for an operation on one format
    pub fn for_format(self, name: &str) -> ClipboardError {
        match self {
            Self::NotPresent => ClipboardError::FormatNotPresent(name.to_string()),
            other => other.into(),
        }
    }
}

impl From<BackendError> for ClipboardError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Busy => ClipboardError::ResourceBusy {
                waited: StdDuration::ZERO,
            },
            BackendError::InvalidOwner => {
                ClipboardError::Backend("owner window is not a live window".to_string())
            }
            BackendError::NotPresent => ClipboardError::FormatNotPresent("unknown".to_string()),
            BackendError::Unavailable(msg) => ClipboardError::Fatal(msg),
            BackendError::Failed(msg) => ClipboardError::Backend(msg),
        }
    }
}

/// Port for the OS clipboard primitives
pub trait ClipboardBackend: Send + Sync {
    /// Open the clipboard on behalf of `owner` (or the current context).
    /// Returns `Busy` when another window has it open.
    fn open(&self, owner: Option<WindowId>) -> Result<(), BackendError>;

    /// Close the clipboard opened by `open`
    fn close(&self, held: &Held);

    /// Advance the format cursor. `None` starts from the beginning.
    /// `Ok(None)` means no formats remain.
    fn next_format(&self, held: &Held, after: Option<FormatId>) -> Result<Option<FormatId>, BackendError>;

    /// Registered name of `id`, truncated to `max_len` UTF-16 units.
    /// None when the id has no registered name.
    fn format_name(&self, id: FormatId, max_len: usize) -> Option<String>;

    /// Cheap membership check against the currently published formats
    fn is_format_available(&self, held: &Held, id: FormatId) -> bool;

    /// Copy the payload of `id` into an owned buffer
    fn read(&self, held: &Held, id: FormatId) -> Result<Vec<u8>, BackendError>;

    /// Remove all formats and take clipboard ownership
    fn empty(&self, held: &Held) -> Result<(), BackendError>;

    /// Publish `data` under `id`
    fn write(&self, held: &Held, id: FormatId, data: &[u8]) -> Result<(), BackendError>;

    /// OS-global clipboard sequence number. None when the OS doesn't expose one.
    fn sequence_number(&self) -> Option<Generation>;

    /// Window that currently owns the clipboard contents
    fn owner(&self, held: &Held) -> Option<WindowId>;
}
