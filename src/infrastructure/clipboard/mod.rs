//! Text clipboard infrastructure module
//!
//! Uses the native access gate where the platform has one, and arboard
//! everywhere else.

mod arboard;
mod gate;

pub use arboard::ArboardClipboard;
pub use gate::GateTextClipboard;

use crate::application::ports::TextClipboard;
use crate::application::QuickTextAccess;
use crate::domain::config::AppConfig;

/// Create the text clipboard adapter for the current platform
pub fn create_text_clipboard(config: &AppConfig) -> Box<dyn TextClipboard> {
    match super::platform::system_gate(config) {
        Ok(gate) => Box::new(GateTextClipboard::new(QuickTextAccess::new(gate))),
        Err(e) => {
            tracing::debug!(reason = %e, "No native access gate, using arboard");
            Box::new(ArboardClipboard::new())
        }
    }
}
