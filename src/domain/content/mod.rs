//! Clipboard content domain module

mod identity;
mod payload;
mod text;

pub use identity::{Generation, WindowId};
pub use payload::{Freshness, Payload, PayloadCell};
pub use text::{decode_unicode_text, encode_unicode_text};
