//! Text clipboard adapter over an access gate
//!
//! Bridges [`QuickTextAccess`] into async code. Gate acquisition can block
//! for the whole retry deadline, so every call runs on a blocking thread.

use async_trait::async_trait;

use crate::application::ports::TextClipboard;
use crate::application::QuickTextAccess;
use crate::domain::error::ClipboardError;

/// Async text clipboard backed by the process access gate
#[derive(Debug, Clone)]
pub struct GateTextClipboard {
    access: QuickTextAccess,
}

impl GateTextClipboard {
    pub fn new(access: QuickTextAccess) -> Self {
        Self { access }
    }
}

#[async_trait]
impl TextClipboard for GateTextClipboard {
    async fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let access = self.access.clone();
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || access.put_text(&text))
            .await
            .map_err(|e| ClipboardError::Backend(format!("Task join error: {}", e)))?
    }

    async fn paste(&self) -> Result<String, ClipboardError> {
        let access = self.access.clone();
        tokio::task::spawn_blocking(move || access.get_text())
            .await
            .map_err(|e| ClipboardError::Backend(format!("Task join error: {}", e)))?
    }
}
