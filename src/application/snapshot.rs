//! Content snapshot: a versioned view of the published formats
//!
//! Capturing a snapshot only enumerates; payloads are read lazily, one
//! format at a time, and memoized per snapshot.

use std::fmt;

use crate::domain::content::{Generation, Payload, PayloadCell, WindowId};
use crate::domain::error::ClipboardError;
use crate::domain::format::FormatDescriptor;

use super::gate::AccessGate;

fn sequence_unavailable() -> ClipboardError {
    ClipboardError::Fatal("clipboard sequence number is unavailable".to_string())
}

/// Point-in-time view of the clipboard's format list.
///
/// Becomes stale as soon as any process changes the clipboard; staleness is
/// reported, not enforced.
pub struct ContentSnapshot {
    gate: AccessGate,
    requester: Option<WindowId>,
    generation: Generation,
    owner: Option<WindowId>,
    formats: Vec<FormatDescriptor>,
    complete: bool,
    cells: Vec<PayloadCell>,
}

impl ContentSnapshot {
    /// Capture the current format list.
    ///
    /// Holds the gate only while reading the generation, the owner and the
    /// format list.
    pub fn capture(gate: &AccessGate, requester: Option<WindowId>) -> Result<Self, ClipboardError> {
        let access = gate.acquire(requester)?;
        let generation = access.sequence_number().ok_or_else(sequence_unavailable)?;
        let owner = access.owner();
        let (formats, complete) = gate.catalog().enumerate(&access).into_parts();
        access.release();

        tracing::debug!(
            generation = generation.get(),
            formats = formats.len(),
            complete,
            "Captured clipboard snapshot"
        );

        let cells = formats.iter().map(|_| PayloadCell::new()).collect();
        Ok(Self {
            gate: gate.clone(),
            requester,
            generation,
            owner,
            formats,
            complete,
            cells,
        })
    }

    /// Clipboard generation at capture time
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Window that owned the clipboard at capture time
    pub fn owner(&self) -> Option<WindowId> {
        self.owner
    }

    /// Formats in OS publication order
    pub fn formats(&self) -> &[FormatDescriptor] {
        &self.formats
    }

    /// False when enumeration stopped early during capture
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Whether the payload for `name` has already been read
    pub fn is_materialized(&self, name: &str) -> bool {
        self.position(name)
            .map(|index| self.cells[index].is_filled())
            .unwrap_or(false)
    }

    /// Whether the clipboard has changed since capture
    pub fn is_stale(&self) -> Result<bool, ClipboardError> {
        let current = self.gate.generation().ok_or_else(sequence_unavailable)?;
        Ok(self.generation.is_superseded_by(current))
    }

    /// Payload of the format called `name`.
    ///
    /// The first call per format re-acquires the gate, checks the format is
    /// still published and copies its bytes; later calls return the memoized
    /// payload. Concurrent first calls share one read.
    pub fn get(&self, name: &str) -> Result<Payload, ClipboardError> {
        let index = self
            .position(name)
            .ok_or_else(|| ClipboardError::FormatNotPresent(name.to_string()))?;
        let descriptor = &self.formats[index];
        self.cells[index].get_or_try_fill(|| self.materialize(descriptor))
    }

    fn materialize(&self, descriptor: &FormatDescriptor) -> Result<Payload, ClipboardError> {
        let access = self.gate.acquire(self.requester)?;
        if !access.is_format_available(descriptor.id()) {
            return Err(ClipboardError::FormatNotPresent(descriptor.name().to_string()));
        }
        let bytes = access
            .read(descriptor.id())
            .map_err(|e| e.for_format(descriptor.name()))?;
        let observed = access.sequence_number().ok_or_else(sequence_unavailable)?;
        access.release();

        let payload = Payload::observed(bytes, self.generation, observed);
        if payload.is_stale() {
            tracing::debug!(
                format = descriptor.name(),
                captured = self.generation.get(),
                observed = observed.get(),
                "Materialized payload after the clipboard changed"
            );
        }
        Ok(payload)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.formats.iter().position(|f| f.matches_name(name))
    }
}

impl fmt::Debug for ContentSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentSnapshot")
            .field("generation", &self.generation)
            .field("owner", &self.owner)
            .field("formats", &self.formats)
            .field("complete", &self.complete)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::content::Freshness;
    use crate::domain::timing::RetryPolicy;
    use crate::infrastructure::memory::MemoryClipboard;

    fn setup() -> (Arc<MemoryClipboard>, AccessGate) {
        let clipboard = Arc::new(MemoryClipboard::new());
        clipboard.external_set(&[
            ("CF_TEXT", b"hello\0".as_slice()),
            ("CF_BITMAP", b"BM..".as_slice()),
        ]);
        let gate = AccessGate::new(Arc::clone(&clipboard), RetryPolicy::no_retry());
        (clipboard, gate)
    }

    #[test]
    fn capture_reads_catalog_and_releases() {
        let (clipboard, gate) = setup();
        let snapshot = ContentSnapshot::capture(&gate, None).unwrap();

        assert_eq!(snapshot.generation(), clipboard.current_generation());
        assert_eq!(snapshot.formats().len(), 2);
        assert!(snapshot.is_complete());
        assert!(!gate.is_held());
        assert!(!snapshot.is_materialized("TEXT"));
    }

    #[test]
    fn get_memoizes() {
        let (clipboard, gate) = setup();
        let snapshot = ContentSnapshot::capture(&gate, None).unwrap();

        let first = snapshot.get("TEXT").unwrap();
        let second = snapshot.get("CF_TEXT").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.freshness(), Freshness::Current);
        assert_eq!(first.bytes().as_ref(), b"hello\0");
        assert_eq!(clipboard.read_count(), 1);
        assert!(snapshot.is_materialized("TEXT"));
    }

    #[test]
    fn unknown_format_does_not_touch_gate() {
        let (clipboard, gate) = setup();
        let snapshot = ContentSnapshot::capture(&gate, None).unwrap();
        let opens = clipboard.open_attempts();

        let err = snapshot.get("HTML Format").unwrap_err();
        assert_eq!(err, ClipboardError::FormatNotPresent("HTML Format".to_string()));
        assert_eq!(clipboard.open_attempts(), opens);
    }

    #[test]
    fn missing_sequence_number_is_fatal() {
        let (clipboard, gate) = setup();
        clipboard.set_sequence_supported(false);

        let err = ContentSnapshot::capture(&gate, None).unwrap_err();
        assert!(matches!(err, ClipboardError::Fatal(_)));
        assert!(!gate.is_held());
    }

    #[test]
    fn staleness_is_detectable() {
        let (clipboard, gate) = setup();
        let snapshot = ContentSnapshot::capture(&gate, None).unwrap();
        assert!(!snapshot.is_stale().unwrap());

        clipboard.external_set(&[("CF_TEXT", b"bye\0".as_slice())]);
        assert!(snapshot.is_stale().unwrap());
    }
}
