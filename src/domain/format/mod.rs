//! Clipboard format domain module

mod descriptor;
mod standard;

pub use descriptor::{FormatDescriptor, FormatId, FormatKind};
pub use standard::{StandardFormat, ALL_STANDARD_FORMATS};
