//! Window identity and clipboard generation value objects

use std::fmt;

/// Opaque native window identity. Never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(isize);

impl WindowId {
    /// Wrap a raw handle; returns None for the null handle
    pub const fn new(raw: isize) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub const fn raw(&self) -> isize {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// OS-assigned clipboard sequence number.
/// Advances every time any process changes the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Whether `current` shows the clipboard changed after this generation
    pub fn is_superseded_by(&self, current: Generation) -> bool {
        current != *self
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_window_is_rejected() {
        assert!(WindowId::new(0).is_none());
        assert_eq!(WindowId::new(0x1234).map(|w| w.raw()), Some(0x1234));
    }

    #[test]
    fn window_displays_as_hex() {
        let window = WindowId::new(255).unwrap();
        assert_eq!(window.to_string(), "0xff");
    }

    #[test]
    fn generation_superseded() {
        let captured = Generation::new(10);
        assert!(!captured.is_superseded_by(Generation::new(10)));
        assert!(captured.is_superseded_by(Generation::new(11)));
    }
}
