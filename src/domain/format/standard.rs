//! Well-known clipboard formats

use std::fmt;

/// All predefined clipboard formats, in id order
pub const ALL_STANDARD_FORMATS: &[StandardFormat] = &[
    StandardFormat::Text,
    StandardFormat::Bitmap,
    StandardFormat::MetafilePict,
    StandardFormat::Sylk,
    StandardFormat::Dif,
    StandardFormat::Tiff,
    StandardFormat::OemText,
    StandardFormat::Dib,
    StandardFormat::Palette,
    StandardFormat::PenData,
    StandardFormat::Riff,
    StandardFormat::Wave,
    StandardFormat::UnicodeText,
    StandardFormat::EnhMetafile,
    StandardFormat::HDrop,
    StandardFormat::Locale,
    StandardFormat::DibV5,
    StandardFormat::OwnerDisplay,
    StandardFormat::DspText,
    StandardFormat::DspBitmap,
    StandardFormat::DspMetafilePict,
    StandardFormat::DspEnhMetafile,
];

/// Predefined clipboard formats with fixed numeric ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFormat {
    Text,
    Bitmap,
    MetafilePict,
    Sylk,
    Dif,
    Tiff,
    OemText,
    Dib,
    Palette,
    PenData,
    Riff,
    Wave,
    UnicodeText,
    EnhMetafile,
    HDrop,
    Locale,
    DibV5,
    OwnerDisplay,
    DspText,
    DspBitmap,
    DspMetafilePict,
    DspEnhMetafile,
}

impl StandardFormat {
    /// Numeric id the OS uses for this format
    pub const fn id(&self) -> u32 {
        match self {
            Self::Text => 1,
            Self::Bitmap => 2,
            Self::MetafilePict => 3,
            Self::Sylk => 4,
            Self::Dif => 5,
            Self::Tiff => 6,
            Self::OemText => 7,
            Self::Dib => 8,
            Self::Palette => 9,
            Self::PenData => 10,
            Self::Riff => 11,
            Self::Wave => 12,
            Self::UnicodeText => 13,
            Self::EnhMetafile => 14,
            Self::HDrop => 15,
            Self::Locale => 16,
            Self::DibV5 => 17,
            Self::OwnerDisplay => 0x0080,
            Self::DspText => 0x0081,
            Self::DspBitmap => 0x0082,
            Self::DspMetafilePict => 0x0083,
            Self::DspEnhMetafile => 0x008E,
        }
    }

    /// Canonical `CF_*` name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text => "CF_TEXT",
            Self::Bitmap => "CF_BITMAP",
            Self::MetafilePict => "CF_METAFILEPICT",
            Self::Sylk => "CF_SYLK",
            Self::Dif => "CF_DIF",
            Self::Tiff => "CF_TIFF",
            Self::OemText => "CF_OEMTEXT",
            Self::Dib => "CF_DIB",
            Self::Palette => "CF_PALETTE",
            Self::PenData => "CF_PENDATA",
            Self::Riff => "CF_RIFF",
            Self::Wave => "CF_WAVE",
            Self::UnicodeText => "CF_UNICODETEXT",
            Self::EnhMetafile => "CF_ENHMETAFILE",
            Self::HDrop => "CF_HDROP",
            Self::Locale => "CF_LOCALE",
            Self::DibV5 => "CF_DIBV5",
            Self::OwnerDisplay => "CF_OWNERDISPLAY",
            Self::DspText => "CF_DSPTEXT",
            Self::DspBitmap => "CF_DSPBITMAP",
            Self::DspMetafilePict => "CF_DSPMETAFILEPICT",
            Self::DspEnhMetafile => "CF_DSPENHMETAFILE",
        }
    }

    /// Short alias without the `CF_` prefix ("TEXT", "BITMAP", ...)
    pub fn alias(&self) -> &'static str {
        &self.name()[3..]
    }

    /// Look up a format by its numeric id
    pub fn from_id(id: u32) -> Option<Self> {
        ALL_STANDARD_FORMATS.iter().copied().find(|f| f.id() == id)
    }

    /// Look up a format by `CF_*` name or short alias, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        ALL_STANDARD_FORMATS.iter().copied().find(|f| {
            f.name().eq_ignore_ascii_case(name) || f.alias().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for StandardFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        for (i, a) in ALL_STANDARD_FORMATS.iter().enumerate() {
            for b in &ALL_STANDARD_FORMATS[i + 1..] {
                assert_ne!(a.id(), b.id(), "{} and {} share an id", a, b);
            }
        }
    }

    #[test]
    fn from_id_round_trips_table() {
        for format in ALL_STANDARD_FORMATS {
            assert_eq!(StandardFormat::from_id(format.id()), Some(*format));
        }
        assert_eq!(StandardFormat::from_id(0), None);
        assert_eq!(StandardFormat::from_id(18), None);
    }

    #[test]
    fn from_name_accepts_alias_and_prefix() {
        assert_eq!(StandardFormat::from_name("TEXT"), Some(StandardFormat::Text));
        assert_eq!(StandardFormat::from_name("cf_bitmap"), Some(StandardFormat::Bitmap));
        assert_eq!(
            StandardFormat::from_name(" UnicodeText "),
            Some(StandardFormat::UnicodeText)
        );
        assert_eq!(StandardFormat::from_name("HTML Format"), None);
    }

    #[test]
    fn alias_strips_prefix() {
        assert_eq!(StandardFormat::HDrop.alias(), "HDROP");
        assert_eq!(StandardFormat::DspEnhMetafile.alias(), "DSPENHMETAFILE");
    }
}
