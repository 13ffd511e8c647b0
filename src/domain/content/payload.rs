//! Materialized payloads and their compute-once cells

use bytes::Bytes;
use once_cell::sync::OnceCell;

use crate::domain::error::ClipboardError;

use super::identity::Generation;

/// Whether a payload was read before or after the clipboard moved on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Read while the clipboard was still at the captured generation
    Current,
    /// Read successfully, but the clipboard had already changed
    Stale {
        captured: Generation,
        observed: Generation,
    },
}

/// Owned copy of one format's bytes, detached from OS memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Bytes,
    freshness: Freshness,
}

impl Payload {
    pub fn new(bytes: impl Into<Bytes>, freshness: Freshness) -> Self {
        Self {
            bytes: bytes.into(),
            freshness,
        }
    }

    /// Build a payload, flagging it stale when `observed` differs from `captured`
    pub fn observed(bytes: impl Into<Bytes>, captured: Generation, observed: Generation) -> Self {
        let freshness = if captured.is_superseded_by(observed) {
            Freshness::Stale { captured, observed }
        } else {
            Freshness::Current
        };
        Self::new(bytes, freshness)
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Stale { .. })
    }

    /// Get the bytes, rejecting a stale read
    pub fn require_fresh(self) -> Result<Bytes, ClipboardError> {
        match self.freshness {
            Freshness::Current => Ok(self.bytes),
            Freshness::Stale { captured, observed } => {
                Err(ClipboardError::Stale { captured, observed })
            }
        }
    }

    /// Get the bytes regardless of freshness
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

/// Compute-once slot for one format's payload.
///
/// The first caller runs the initializer; concurrent callers block until it
/// finishes and then reuse the stored payload. A failed initializer leaves
/// the slot empty.
#[derive(Debug, Default)]
pub struct PayloadCell {
    slot: OnceCell<Payload>,
}

impl PayloadCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored payload, if any. Never waits on an in-flight fill.
    pub fn get(&self) -> Option<&Payload> {
        self.slot.get()
    }

    pub fn is_filled(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Return the stored payload or fill the slot with `init`
    pub fn get_or_try_fill<E, F>(&self, init: F) -> Result<Payload, E>
    where
        F: FnOnce() -> Result<Payload, E>,
    {
        self.slot.get_or_try_init(init).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn observed_flags_stale() {
        let fresh = Payload::observed(vec![1, 2], Generation::new(3), Generation::new(3));
        assert!(!fresh.is_stale());

        let stale = Payload::observed(vec![1, 2], Generation::new(3), Generation::new(4));
        assert!(stale.is_stale());
        assert_eq!(
            stale.require_fresh(),
            Err(ClipboardError::Stale {
                captured: Generation::new(3),
                observed: Generation::new(4),
            })
        );
    }

    #[test]
    fn cell_fills_once() {
        let cell = PayloadCell::new();
        let calls = AtomicUsize::new(0);
        let fill = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ClipboardError>(Payload::new(vec![7u8], Freshness::Current))
        };

        let first = cell.get_or_try_fill(fill).unwrap();
        let second = cell
            .get_or_try_fill(|| -> Result<Payload, ClipboardError> { panic!("refilled") })
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cell.is_filled());
    }

    #[test]
    fn failed_fill_leaves_cell_empty() {
        let cell = PayloadCell::new();
        let err = cell
            .get_or_try_fill(|| Err(ClipboardError::Cancelled))
            .unwrap_err();
        assert_eq!(err, ClipboardError::Cancelled);
        assert!(!cell.is_filled());

        let payload = cell
            .get_or_try_fill(|| Ok::<_, ClipboardError>(Payload::new(vec![1u8], Freshness::Current)))
            .unwrap();
        assert_eq!(payload.bytes().as_ref(), &[1u8]);
    }

    #[test]
    fn filled_cell_stays_visible_while_read() {
        let cell = PayloadCell::new();
        cell.get_or_try_fill(|| Ok::<_, ClipboardError>(Payload::new(vec![2u8], Freshness::Current)))
            .unwrap();

        let held = cell.get().unwrap();
        assert!(cell.is_filled());
        assert_eq!(held.bytes().as_ref(), &[2u8]);
    }
}
