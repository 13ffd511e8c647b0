//! Format catalog: ordered enumeration of published formats

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::domain::config::DEFAULT_MAX_NAME_LEN;
use crate::domain::format::{FormatDescriptor, FormatId, FormatKind};

use super::gate::ScopedAccess;

/// Result of one enumeration pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    formats: Vec<FormatDescriptor>,
    complete: bool,
}

impl Enumeration {
    /// Formats in the order the OS published them
    pub fn formats(&self) -> &[FormatDescriptor] {
        &self.formats
    }

    /// False when enumeration stopped early; `formats` then holds a prefix
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn into_parts(self) -> (Vec<FormatDescriptor>, bool) {
        (self.formats, self.complete)
    }
}

/// Enumerates formats and resolves their names.
///
/// Descriptors are cached per id: format ids are stable for the OS session,
/// so each id is classified and named at most once.
#[derive(Debug)]
pub struct FormatCatalog {
    max_name_len: usize,
    descriptors: Mutex<HashMap<FormatId, FormatDescriptor>>,
}

impl FormatCatalog {
    /// Create a catalog reading registered names into a `max_name_len` buffer
    pub fn new(max_name_len: usize) -> Self {
        Self {
            max_name_len: max_name_len.max(1),
            descriptors: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_name_len(&self) -> usize {
        self.max_name_len
    }

    /// Walk the OS format cursor from the start until it is exhausted.
    ///
    /// Formats that vanish while being named are skipped. A failing cursor
    /// ends the walk and yields a partial, incomplete result.
    pub fn enumerate(&self, access: &ScopedAccess<'_>) -> Enumeration {
        let mut formats = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = None;
        let mut complete = true;

        loop {
            let id = match access.next_format(cursor) {
                Ok(Some(id)) => id,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(
                        collected = formats.len(),
                        error = %e,
                        "Format enumeration failed mid-stream"
                    );
                    complete = false;
                    break;
                }
            };

            if !seen.insert(id) {
                tracing::warn!(format = id.get(), "Format cursor repeated an id, stopping");
                complete = false;
                break;
            }
            cursor = Some(id);

            match self.describe(access, id) {
                Some(descriptor) => formats.push(descriptor),
                None => {
                    tracing::debug!(format = id.get(), "Registered format vanished during enumeration")
                }
            }
        }

        tracing::trace!(count = formats.len(), complete, "Enumerated clipboard formats");
        Enumeration { formats, complete }
    }

    /// Descriptor for `id`, or None when a registered id has no name anymore
    pub fn describe(&self, access: &ScopedAccess<'_>, id: FormatId) -> Option<FormatDescriptor> {
        if let Some(descriptor) = self.descriptors.lock().get(&id) {
            return Some(descriptor.clone());
        }

        let kind = id.kind();
        let name = match kind {
            FormatKind::Registered => access.format_name(id, self.max_name_len)?,
            _ => kind.fixed_name(id)?,
        };
        let descriptor = FormatDescriptor::new(id, kind, name);

        self.descriptors.lock().insert(id, descriptor.clone());
        Some(descriptor)
    }
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NAME_LEN)
    }
}
