//! Cross-platform text clipboard adapter using arboard
//!
//! Used where no native access gate exists (macOS, X11, Wayland). Each call
//! opens its own arboard handle on a blocking thread.

use async_trait::async_trait;

use crate::application::ports::TextClipboard;
use crate::domain::error::ClipboardError;
use crate::domain::format::StandardFormat;

/// Text clipboard adapter using arboard
pub struct ArboardClipboard;

impl ArboardClipboard {
    /// Create a new arboard clipboard adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn map_arboard_error(err: arboard::Error) -> ClipboardError {
    match err {
        arboard::Error::ContentNotAvailable => {
            ClipboardError::FormatNotPresent(StandardFormat::UnicodeText.name().to_string())
        }
        arboard::Error::ClipboardOccupied => ClipboardError::ResourceBusy {
            waited: std::time::Duration::ZERO,
        },
        arboard::Error::ClipboardNotSupported => {
            ClipboardError::Fatal("clipboard is not supported in this environment".to_string())
        }
        other => ClipboardError::Backend(other.to_string()),
    }
}

fn join_error(err: tokio::task::JoinError) -> ClipboardError {
    ClipboardError::Backend(format!("Task join error: {}", err))
}

#[async_trait]
impl TextClipboard for ArboardClipboard {
    async fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_owned();

        // arboard operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new().map_err(map_arboard_error)?;
            clipboard.set_text(text).map_err(map_arboard_error)
        })
        .await
        .map_err(join_error)?
    }

    async fn paste(&self) -> Result<String, ClipboardError> {
        tokio::task::spawn_blocking(|| {
            let mut clipboard = arboard::Clipboard::new().map_err(map_arboard_error)?;
            clipboard.get_text().map_err(map_arboard_error)
        })
        .await
        .map_err(join_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_text_maps_to_not_present() {
        assert_eq!(
            map_arboard_error(arboard::Error::ContentNotAvailable),
            ClipboardError::FormatNotPresent("CF_UNICODETEXT".to_string())
        );
    }

    #[test]
    fn occupied_maps_to_busy() {
        assert!(map_arboard_error(arboard::Error::ClipboardOccupied).is_retryable());
    }

    #[test]
    fn unsupported_is_fatal() {
        assert!(matches!(
            map_arboard_error(arboard::Error::ClipboardNotSupported),
            ClipboardError::Fatal(_)
        ));
    }
}
