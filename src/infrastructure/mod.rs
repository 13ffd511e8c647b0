//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the Win32
//! clipboard and message window, an in-memory clipboard, arboard text
//! access and the XDG config store.

pub mod clipboard;
pub mod config;
pub mod memory;
pub mod platform;
#[cfg(windows)]
pub mod win32;

// Re-export adapters
pub use clipboard::{create_text_clipboard, ArboardClipboard, GateTextClipboard};
pub use config::XdgConfigStore;
pub use memory::MemoryClipboard;
pub use platform::{system_gate, system_monitor};
#[cfg(windows)]
pub use win32::{Win32Clipboard, Win32NotificationHost};
