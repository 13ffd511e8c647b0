//! Format identifiers and descriptors

use std::fmt;
use std::sync::Arc;

use super::standard::StandardFormat;

const PRIVATE_FIRST: u32 = 0x0200;
const PRIVATE_LAST: u32 = 0x02FF;
const GDI_OBJECT_FIRST: u32 = 0x0300;
const GDI_OBJECT_LAST: u32 = 0x03FF;
const REGISTERED_FIRST: u32 = 0xC000;
const REGISTERED_LAST: u32 = 0xFFFF;

/// Numeric clipboard format id, stable for the lifetime of the OS session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatId(u32);

impl FormatId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Classify this id into the range it belongs to
    pub fn kind(&self) -> FormatKind {
        if let Some(format) = StandardFormat::from_id(self.0) {
            return FormatKind::Standard(format);
        }
        match self.0 {
            id @ PRIVATE_FIRST..=PRIVATE_LAST => FormatKind::Private(id - PRIVATE_FIRST),
            id @ GDI_OBJECT_FIRST..=GDI_OBJECT_LAST => FormatKind::GdiObject(id - GDI_OBJECT_FIRST),
            REGISTERED_FIRST..=REGISTERED_LAST => FormatKind::Registered,
            _ => FormatKind::Unknown,
        }
    }
}

impl From<StandardFormat> for FormatId {
    fn from(format: StandardFormat) -> Self {
        Self(format.id())
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which id range a format belongs to, resolved once per id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// Predefined `CF_*` format with a fixed name
    Standard(StandardFormat),
    /// Application-private range, offset from `CF_PRIVATEFIRST`
    Private(u32),
    /// GDI object range, offset from `CF_GDIOBJFIRST`
    GdiObject(u32),
    /// Dynamically registered format whose name must be queried from the OS
    Registered,
    /// Outside every known range
    Unknown,
}

impl FormatKind {
    /// Short label used in listings
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Standard(_) => "standard",
            Self::Private(_) => "private",
            Self::GdiObject(_) => "gdi-object",
            Self::Registered => "registered",
            Self::Unknown => "unknown",
        }
    }

    /// Name for formats that don't need an OS lookup.
    /// Returns None for registered formats.
    pub fn fixed_name(&self, id: FormatId) -> Option<String> {
        match self {
            Self::Standard(format) => Some(format.name().to_string()),
            Self::Private(offset) => Some(format!("CF_PRIVATEFIRST+{:#x}", offset)),
            Self::GdiObject(offset) => Some(format!("CF_GDIOBJFIRST+{:#x}", offset)),
            Self::Registered => None,
            Self::Unknown => Some(format!("#{}", id.get())),
        }
    }
}

/// An entry of the published format list. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    id: FormatId,
    kind: FormatKind,
    name: Arc<str>,
}

impl FormatDescriptor {
    pub fn new(id: FormatId, kind: FormatKind, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
        }
    }

    /// Descriptor for a well-known format
    pub fn standard(format: StandardFormat) -> Self {
        Self::new(format.into(), FormatKind::Standard(format), format.name())
    }

    pub fn id(&self) -> FormatId {
        self.id
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `name` refers to this format.
    /// Standard formats also answer to their short alias; registered names are
    /// compared case-insensitively, matching how the OS registers them.
    pub fn matches_name(&self, name: &str) -> bool {
        match self.kind {
            FormatKind::Standard(format) => StandardFormat::from_name(name) == Some(format),
            _ => self.name.eq_ignore_ascii_case(name.trim()),
        }
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
