//! In-process clipboard adapter
//!
//! Simulates the OS clipboard and its notification window inside the
//! process: one exclusive open slot, an ordered format list, a global
//! sequence number and a registered-name table. Other processes are
//! simulated through the `external_*` methods.
//!
//! Change signals are delivered synchronously on the thread that caused the
//! change, after the internal lock is released.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::application::ports::{BackendError, ChangeSink, ClipboardBackend, Held, HostError, NotificationHost};
use crate::domain::content::{Generation, WindowId};
use crate::domain::format::{FormatId, FormatKind, StandardFormat};

const REGISTERED_BASE: u32 = 0xC000;
const FIRST_WINDOW: isize = 0x1000;

/// Window that owns content written through the `external_*` methods
pub const EXTERNAL_OWNER: WindowId = match WindowId::new(0x7e57) {
    Some(window) => window,
    None => panic!("external owner must not be null"),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    Local(Option<WindowId>),
    External,
}

#[derive(Default)]
struct WindowSlot {
    sink: Option<ChangeSink>,
    listening: bool,
}

struct State {
    opened: Option<Opener>,
    entries: Vec<(FormatId, Vec<u8>)>,
    registered: Vec<String>,
    sequence: u64,
    sequence_supported: bool,
    owner: Option<WindowId>,
    changed_while_open: bool,

    busy_opens: u32,
    enumeration_limit: Option<usize>,
    fail_next_write: bool,
    open_attempts: usize,
    reads: usize,

    windows: HashMap<WindowId, WindowSlot>,
    next_window: isize,
    fail_next_registration: bool,
    registrations: usize,
    unregistrations: usize,
}

impl State {
    fn register(&mut self, name: &str) -> FormatId {
        let index = match self
            .registered
            .iter()
            .position(|existing| existing.eq_ignore_ascii_case(name))
        {
            Some(index) => index,
            None => {
                self.registered.push(name.to_string());
                self.registered.len() - 1
            }
        };
        FormatId::new(REGISTERED_BASE + index as u32)
    }

    fn registered_name(&self, id: FormatId) -> Option<&str> {
        let index = id.get().checked_sub(REGISTERED_BASE)? as usize;
        self.registered.get(index).map(String::as_str)
    }

    fn id_for_name(&mut self, name: &str) -> FormatId {
        match self.lookup(name) {
            Some(id) => id,
            None => self.register(name),
        }
    }

    /// Id of a standard or already registered name; never registers
    fn lookup(&self, name: &str) -> Option<FormatId> {
        if let Some(format) = StandardFormat::from_name(name) {
            return Some(format.into());
        }
        self.registered
            .iter()
            .position(|existing| existing.eq_ignore_ascii_case(name))
            .map(|index| FormatId::new(REGISTERED_BASE + index as u32))
    }

    fn display_name(&self, id: FormatId) -> String {
        match id.kind() {
            FormatKind::Registered => self
                .registered_name(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", id.get())),
            kind => kind.fixed_name(id).unwrap_or_else(|| format!("#{}", id.get())),
        }
    }

    fn bump(&mut self) {
        self.sequence += 1;
    }

    fn listening_sinks(&self) -> Vec<ChangeSink> {
        self.windows
            .values()
            .filter(|slot| slot.listening)
            .filter_map(|slot| slot.sink.clone())
            .collect()
    }

    fn replace_external(&mut self, entries: Vec<(FormatId, Vec<u8>)>) -> Vec<ChangeSink> {
        self.entries = entries;
        self.owner = Some(EXTERNAL_OWNER);
        self.bump();
        self.listening_sinks()
    }
}

/// Clipboard and notification host living entirely in memory
pub struct MemoryClipboard {
    state: Mutex<State>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                opened: None,
                entries: Vec::new(),
                registered: Vec::new(),
                sequence: 1,
                sequence_supported: true,
                owner: None,
                changed_while_open: false,
                busy_opens: 0,
                enumeration_limit: None,
                fail_next_write: false,
                open_attempts: 0,
                reads: 0,
                windows: HashMap::new(),
                next_window: FIRST_WINDOW,
                fail_next_registration: false,
                registrations: 0,
                unregistrations: 0,
            }),
        }
    }

    /// Whether anyone currently has the clipboard open
    pub fn is_open(&self) -> bool {
        self.state.lock().opened.is_some()
    }

    /// Hold the clipboard as another process would, until the guard drops
    pub fn hold_externally(&self) -> ExternalHold<'_> {
        self.state.lock().opened = Some(Opener::External);
        ExternalHold { clipboard: self }
    }

    /// Make the next `count` open attempts report busy
    pub fn fail_next_opens(&self, count: u32) {
        self.state.lock().busy_opens = count;
    }

    pub fn open_attempts(&self) -> usize {
        self.state.lock().open_attempts
    }

    /// Number of payload reads served
    pub fn read_count(&self) -> usize {
        self.state.lock().reads
    }

    /// Make the format cursor fail once `count` formats have been returned
    pub fn fail_enumeration_after(&self, count: usize) {
        self.state.lock().enumeration_limit = Some(count);
    }

    /// Make the next payload write fail before anything is stored
    pub fn fail_next_write(&self) {
        self.state.lock().fail_next_write = true;
    }

    pub fn set_sequence_supported(&self, supported: bool) {
        self.state.lock().sequence_supported = supported;
    }

    pub fn current_generation(&self) -> Generation {
        Generation::new(self.state.lock().sequence)
    }

    /// Names of the published formats, in publication order
    pub fn format_names(&self) -> Vec<String> {
        let state = self.state.lock();
        state.entries.iter().map(|(id, _)| state.display_name(*id)).collect()
    }

    /// Replace the content as another process would. Standard formats are
    /// looked up by name; anything else is registered.
    pub fn external_set(&self, formats: &[(&str, &[u8])]) {
        let sinks = {
            let mut state = self.state.lock();
            let entries = formats
                .iter()
                .map(|(name, data)| (state.id_for_name(name), data.to_vec()))
                .collect();
            state.replace_external(entries)
        };
        notify(sinks);
    }

    /// Replace the content using raw format ids
    pub fn external_set_ids(&self, formats: &[(FormatId, &[u8])]) {
        let sinks = {
            let mut state = self.state.lock();
            let entries = formats.iter().map(|(id, data)| (*id, data.to_vec())).collect();
            state.replace_external(entries)
        };
        notify(sinks);
    }

    /// Drop one format as another process would. Returns false when the
    /// format wasn't published.
    pub fn external_remove(&self, name: &str) -> bool {
        let sinks = {
            let mut state = self.state.lock();
            let Some(id) = state.lookup(name) else {
                return false;
            };
            let before = state.entries.len();
            state.entries.retain(|(existing, _)| *existing != id);
            if state.entries.len() == before {
                return false;
            }
            state.owner = Some(EXTERNAL_OWNER);
            state.bump();
            state.listening_sinks()
        };
        notify(sinks);
        true
    }

    /// A live window with no listener, usable as an access owner
    pub fn create_owner_window(&self) -> WindowId {
        let mut state = self.state.lock();
        let window = next_window_id(&mut state);
        state.windows.insert(window, WindowSlot::default());
        window
    }

    /// Make the next listener registration fail
    pub fn fail_next_listener_registration(&self) {
        self.state.lock().fail_next_registration = true;
    }

    pub fn listener_registrations(&self) -> usize {
        self.state.lock().registrations
    }

    pub fn listener_unregistrations(&self) -> usize {
        self.state.lock().unregistrations
    }

    /// Windows created through [`NotificationHost::create_window`] and not
    /// yet destroyed
    pub fn live_notification_windows(&self) -> usize {
        self.state
            .lock()
            .windows
            .values()
            .filter(|slot| slot.sink.is_some())
            .count()
    }
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn next_window_id(state: &mut State) -> WindowId {
    state.next_window += 0x10;
    WindowId::new(state.next_window).unwrap_or(EXTERNAL_OWNER)
}

fn notify(sinks: Vec<ChangeSink>) {
    for sink in sinks {
        sink();
    }
}

/// Simulated foreign hold on the clipboard
#[must_use = "the clipboard is released when the hold is dropped"]
pub struct ExternalHold<'a> {
    clipboard: &'a MemoryClipboard,
}

impl Drop for ExternalHold<'_> {
    fn drop(&mut self) {
        let mut state = self.clipboard.state.lock();
        if state.opened == Some(Opener::External) {
            state.opened = None;
        }
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn open(&self, owner: Option<WindowId>) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        state.open_attempts += 1;

        if let Some(window) = owner {
            if !state.windows.contains_key(&window) {
                return Err(BackendError::InvalidOwner);
            }
        }
        if state.busy_opens > 0 {
            state.busy_opens -= 1;
            return Err(BackendError::Busy);
        }
        if state.opened.is_some() {
            return Err(BackendError::Busy);
        }

        state.opened = Some(Opener::Local(owner));
        Ok(())
    }

    fn close(&self, _held: &Held) {
        let sinks = {
            let mut state = self.state.lock();
            state.opened = None;
            if std::mem::take(&mut state.changed_while_open) {
                state.listening_sinks()
            } else {
                Vec::new()
            }
        };
        notify(sinks);
    }

    fn next_format(&self, _held: &Held, after: Option<FormatId>) -> Result<Option<FormatId>, BackendError> {
        let state = self.state.lock();
        let index = match after {
            None => 0,
            Some(id) => match state.entries.iter().position(|(existing, _)| *existing == id) {
                Some(position) => position + 1,
                None => return Ok(None),
            },
        };

        if state.enumeration_limit.is_some_and(|limit| index >= limit) {
            return Err(BackendError::Failed("simulated enumeration failure".to_string()));
        }
        Ok(state.entries.get(index).map(|(id, _)| *id))
    }

    fn format_name(&self, id: FormatId, max_len: usize) -> Option<String> {
        let state = self.state.lock();
        let name = state.registered_name(id)?;
        let units: Vec<u16> = name.encode_utf16().take(max_len).collect();
        Some(String::from_utf16_lossy(&units))
    }

    fn is_format_available(&self, _held: &Held, id: FormatId) -> bool {
        self.state.lock().entries.iter().any(|(existing, _)| *existing == id)
    }

    fn read(&self, _held: &Held, id: FormatId) -> Result<Vec<u8>, BackendError> {
        let mut state = self.state.lock();
        state.reads += 1;
        state
            .entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, data)| data.clone())
            .ok_or(BackendError::NotPresent)
    }

    fn empty(&self, _held: &Held) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        let owner = match state.opened {
            Some(Opener::Local(owner)) => owner,
            _ => None,
        };
        state.entries.clear();
        state.owner = owner;
        state.bump();
        state.changed_while_open = true;
        Ok(())
    }

    fn write(&self, _held: &Held, id: FormatId, data: &[u8]) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_next_write) {
            return Err(BackendError::Failed("simulated write failure".to_string()));
        }
        match state.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing)) => *existing = data.to_vec(),
            None => state.entries.push((id, data.to_vec())),
        }
        state.bump();
        state.changed_while_open = true;
        Ok(())
    }

    fn sequence_number(&self) -> Option<Generation> {
        let state = self.state.lock();
        state.sequence_supported.then(|| Generation::new(state.sequence))
    }

    fn owner(&self, _held: &Held) -> Option<WindowId> {
        self.state.lock().owner
    }
}

impl NotificationHost for MemoryClipboard {
    fn create_window(&self, sink: ChangeSink) -> Result<WindowId, HostError> {
        let mut state = self.state.lock();
        let window = next_window_id(&mut state);
        state.windows.insert(
            window,
            WindowSlot {
                sink: Some(sink),
                listening: false,
            },
        );
        Ok(window)
    }

    fn register_listener(&self, window: WindowId) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_next_registration) {
            return Err(HostError::Registration("simulated registration failure".to_string()));
        }
        let slot = state
            .windows
            .get_mut(&window)
            .ok_or_else(|| HostError::Registration(format!("no window {}", window)))?;
        slot.listening = true;
        state.registrations += 1;
        Ok(())
    }

    fn unregister_listener(&self, window: WindowId) {
        let mut state = self.state.lock();
        if let Some(slot) = state.windows.get_mut(&window) {
            if std::mem::take(&mut slot.listening) {
                state.unregistrations += 1;
            }
        }
    }

    fn destroy_window(&self, window: WindowId) {
        self.state.lock().windows.remove(&window);
    }
}
