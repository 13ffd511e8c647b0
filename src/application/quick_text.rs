//! Plain-text fast path
//!
//! One gate acquisition per call and a single read or write of
//! `CF_UNICODETEXT`; no enumeration and no memoization.

use crate::domain::content::{decode_unicode_text, encode_unicode_text, WindowId};
use crate::domain::error::ClipboardError;
use crate::domain::format::{FormatId, StandardFormat};

use super::gate::AccessGate;

const TEXT_FORMAT: StandardFormat = StandardFormat::UnicodeText;

/// Direct text read/write on top of an [`AccessGate`]
#[derive(Debug, Clone)]
pub struct QuickTextAccess {
    gate: AccessGate,
    owner: Option<WindowId>,
}

impl QuickTextAccess {
    pub fn new(gate: AccessGate) -> Self {
        Self { gate, owner: None }
    }

    /// Attribute every access to `owner`
    pub fn with_owner(mut self, owner: WindowId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Replace the whole clipboard with `text`, taking ownership
    pub fn put_text(&self, text: &str) -> Result<(), ClipboardError> {
        let encoded = encode_unicode_text(text);
        let access = self.gate.acquire(self.owner)?;
        access.empty()?;
        access
            .write(FormatId::from(TEXT_FORMAT), &encoded)
            .map_err(|e| e.for_format(TEXT_FORMAT.name()))?;
        access.release();

        tracing::debug!(chars = text.chars().count(), "Wrote text to clipboard");
        Ok(())
    }

    /// Read the clipboard as text
    pub fn get_text(&self) -> Result<String, ClipboardError> {
        let id = FormatId::from(TEXT_FORMAT);
        let access = self.gate.acquire(self.owner)?;
        if !access.is_format_available(id) {
            return Err(ClipboardError::FormatNotPresent(TEXT_FORMAT.name().to_string()));
        }
        let bytes = access.read(id).map_err(|e| e.for_format(TEXT_FORMAT.name()))?;
        access.release();

        Ok(decode_unicode_text(&bytes))
    }
}
