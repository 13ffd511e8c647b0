//! Text clipboard port interface

use async_trait::async_trait;

use crate::domain::error::ClipboardError;

/// Port for plain-text clipboard operations from async code
#[async_trait]
pub trait TextClipboard: Send + Sync {
    /// Copy text to the system clipboard, replacing its contents.
    ///
    /// # Arguments
    /// * `text` - The text to copy
    async fn copy(&self, text: &str) -> Result<(), ClipboardError>;

    /// Read the current plain text.
    ///
    /// # Returns
    /// The text, or `FormatNotPresent` when the clipboard holds no text
    async fn paste(&self) -> Result<String, ClipboardError>;
}

/// Blanket implementation for boxed clipboard types
#[async_trait]
impl TextClipboard for Box<dyn TextClipboard> {
    async fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        self.as_ref().copy(text).await
    }

    async fn paste(&self) -> Result<String, ClipboardError> {
        self.as_ref().paste().await
    }
}
