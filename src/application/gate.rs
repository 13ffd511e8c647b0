//! Access gate: exclusive, time-bounded clipboard access
//!
//! The OS clipboard is a single critical section shared by every process.
//! [`AccessGate::acquire`] opens it with a bounded retry, and the returned
//! [`ScopedAccess`] closes it again on every exit path.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration as StdDuration, Instant};

use parking_lot::Mutex;

use crate::domain::content::{Generation, WindowId};
use crate::domain::error::ClipboardError;
use crate::domain::format::FormatId;
use crate::domain::timing::RetryPolicy;

use super::catalog::FormatCatalog;
use super::ports::{BackendError, ClipboardBackend, Held};

/// Longest uninterrupted sleep inside the retry loop
const CANCEL_POLL_SLICE: StdDuration = StdDuration::from_millis(5);

/// Shortest pause between attempts, so a zero interval doesn't spin
const MIN_PAUSE: StdDuration = StdDuration::from_millis(1);

/// Cooperative cancellation signal for [`AccessGate::acquire_with`]
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every acquisition watching this flag
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct GateInner {
    backend: Arc<dyn ClipboardBackend>,
    policy: RetryPolicy,
    catalog: FormatCatalog,
    holder: Mutex<Option<ThreadId>>,
}

/// Capability to open the clipboard. Cheap to clone; clones share the
/// same exclusion state, so at most one [`ScopedAccess`] exists per gate.
#[derive(Clone)]
pub struct AccessGate {
    inner: Arc<GateInner>,
}

enum Attempt<'g> {
    Acquired(ScopedAccess<'g>),
    Busy,
    Failed(ClipboardError),
}

impl AccessGate {
    /// Create a gate over `backend` with the default format catalog
    pub fn new<B: ClipboardBackend + 'static>(backend: Arc<B>, policy: RetryPolicy) -> Self {
        Self::with_catalog(backend, policy, FormatCatalog::default())
    }

    /// Create a gate with an explicitly configured format catalog
    pub fn with_catalog<B: ClipboardBackend + 'static>(
        backend: Arc<B>,
        policy: RetryPolicy,
        catalog: FormatCatalog,
    ) -> Self {
        Self {
            inner: Arc::new(GateInner {
                backend,
                policy,
                catalog,
                holder: Mutex::new(None),
            }),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.inner.policy
    }

    /// Format catalog whose name cache is shared by everything using this gate
    pub fn catalog(&self) -> &FormatCatalog {
        &self.inner.catalog
    }

    /// Whether some thread currently holds this gate
    pub fn is_held(&self) -> bool {
        self.inner.holder.lock().is_some()
    }

    /// Current OS clipboard generation. Does not need the gate.
    pub fn generation(&self) -> Option<Generation> {
        self.inner.backend.sequence_number()
    }

    /// Acquire exclusive access, retrying while the clipboard is busy
    pub fn acquire(&self, owner: Option<WindowId>) -> Result<ScopedAccess<'_>, ClipboardError> {
        self.acquire_with(owner, &CancelFlag::new())
    }

    /// Acquire exclusive access, giving up early once `cancel` is raised
    pub fn acquire_with(
        &self,
        owner: Option<WindowId>,
        cancel: &CancelFlag,
    ) -> Result<ScopedAccess<'_>, ClipboardError> {
        let me = thread::current().id();
        let started = Instant::now();
        let deadline = self.inner.policy.deadline().as_std();
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(ClipboardError::Cancelled);
            }
            attempt += 1;

            match self.try_acquire(owner, me) {
                Attempt::Acquired(access) => {
                    if attempt > 1 {
                        tracing::debug!(
                            attempts = attempt,
                            waited_ms = started.elapsed().as_millis() as u64,
                            "Clipboard acquired after retrying"
                        );
                    }
                    return Ok(access);
                }
                Attempt::Failed(err) => return Err(err),
                Attempt::Busy => {}
            }

            let elapsed = started.elapsed();
            if elapsed >= deadline {
                tracing::warn!(
                    attempts = attempt,
                    waited_ms = elapsed.as_millis() as u64,
                    "Clipboard still busy at retry deadline"
                );
                return Err(ClipboardError::ResourceBusy { waited: elapsed });
            }

            let remaining = deadline - elapsed;
            let pause = self
                .inner
                .policy
                .delay_after(attempt)
                .max(MIN_PAUSE)
                .min(remaining);
            tracing::trace!(attempt, pause_ms = pause.as_millis() as u64, "Clipboard busy, retrying");
            sleep_unless_cancelled(pause, cancel)?;
        }
    }

    fn try_acquire(&self, owner: Option<WindowId>, me: ThreadId) -> Attempt<'_> {
        let mut holder = self.inner.holder.lock();
        match *holder {
            Some(current) if current == me => return Attempt::Failed(ClipboardError::Reentrant),
            Some(_) => return Attempt::Busy,
            None => {}
        }

        match self.inner.backend.open(owner) {
            Ok(()) => {
                *holder = Some(me);
                Attempt::Acquired(ScopedAccess {
                    gate: self,
                    held: Held::new(),
                    released: false,
                    _not_send: PhantomData,
                })
            }
            Err(BackendError::Busy) => Attempt::Busy,
            Err(BackendError::InvalidOwner) => Attempt::Failed(match owner {
                Some(window) => ClipboardError::InvalidOwner(window),
                None => ClipboardError::Fatal("no valid window for the current context".to_string()),
            }),
            Err(other) => Attempt::Failed(other.into()),
        }
    }

    fn release(&self, held: &Held) {
        // Holder is cleared before closing: a backend may signal a change
        // from `close`, and a listener on this thread must be able to
        // acquire again. Another thread that slips in sees the OS lock and
        // retries as busy.
        *self.inner.holder.lock() = None;
        self.inner.backend.close(held);
    }
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate")
            .field("policy", &self.inner.policy)
            .field("held", &self.is_held())
            .finish()
    }
}

fn sleep_unless_cancelled(pause: StdDuration, cancel: &CancelFlag) -> Result<(), ClipboardError> {
    let wake_at = Instant::now() + pause;
    loop {
        if cancel.is_cancelled() {
            return Err(ClipboardError::Cancelled);
        }
        let now = Instant::now();
        if now >= wake_at {
            return Ok(());
        }
        thread::sleep((wake_at - now).min(CANCEL_POLL_SLICE));
    }
}

/// Live clipboard access. The clipboard is closed when this is dropped or
/// explicitly released, whichever happens first.
///
/// Not `Send`: the OS ties an open clipboard to the opening thread.
pub struct ScopedAccess<'g> {
    gate: &'g AccessGate,
    held: Held,
    released: bool,
    _not_send: PhantomData<*const ()>,
}

impl<'g> ScopedAccess<'g> {
    /// Gate this access was acquired from
    pub fn gate(&self) -> &'g AccessGate {
        self.gate
    }

    /// Close the clipboard now
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.gate.release(&self.held);
        }
    }

    fn backend(&self) -> &dyn ClipboardBackend {
        self.gate.inner.backend.as_ref()
    }

    pub fn next_format(&self, after: Option<FormatId>) -> Result<Option<FormatId>, BackendError> {
        self.backend().next_format(&self.held, after)
    }

    pub fn format_name(&self, id: FormatId, max_len: usize) -> Option<String> {
        self.backend().format_name(id, max_len)
    }

    pub fn is_format_available(&self, id: FormatId) -> bool {
        self.backend().is_format_available(&self.held, id)
    }

    pub fn read(&self, id: FormatId) -> Result<Vec<u8>, BackendError> {
        self.backend().read(&self.held, id)
    }

    pub fn empty(&self) -> Result<(), BackendError> {
        self.backend().empty(&self.held)
    }

    pub fn write(&self, id: FormatId, data: &[u8]) -> Result<(), BackendError> {
        self.backend().write(&self.held, id, data)
    }

    pub fn owner(&self) -> Option<WindowId> {
        self.backend().owner(&self.held)
    }

    pub fn sequence_number(&self) -> Option<Generation> {
        self.backend().sequence_number()
    }
}

impl Drop for ScopedAccess<'_> {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl fmt::Debug for ScopedAccess<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedAccess")
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timing::{Backoff, Duration};
    use crate::infrastructure::memory::MemoryClipboard;

    fn quick_policy() -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(2), Duration::from_millis(60), Backoff::Fixed)
    }

    #[test]
    fn acquire_and_release() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let gate = AccessGate::new(Arc::clone(&clipboard), quick_policy());

        let access = gate.acquire(None).unwrap();
        assert!(gate.is_held());
        assert!(clipboard.is_open());
        access.release();

        assert!(!gate.is_held());
        assert!(!clipboard.is_open());
    }

    #[test]
    fn reacquire_on_same_thread_fails_fast() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let policy = RetryPolicy::new(Duration::from_millis(5), Duration::from_secs(5), Backoff::Fixed);
        let gate = AccessGate::new(clipboard, policy);

        let _access = gate.acquire(None).unwrap();
        let started = Instant::now();
        let err = gate.acquire(None).unwrap_err();

        assert_eq!(err, ClipboardError::Reentrant);
        assert!(started.elapsed() < StdDuration::from_secs(1));
    }

    #[test]
    fn busy_after_deadline() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let gate = AccessGate::new(Arc::clone(&clipboard), quick_policy());
        let _hold = clipboard.hold_externally();

        let err = gate.acquire(None).unwrap_err();
        match err {
            ClipboardError::ResourceBusy { waited } => {
                assert!(waited >= StdDuration::from_millis(60));
            }
            other => panic!("expected ResourceBusy, got {:?}", other),
        }
        assert!(!gate.is_held());
    }

    #[test]
    fn no_retry_policy_tries_once() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let gate = AccessGate::new(Arc::clone(&clipboard), RetryPolicy::no_retry());
        clipboard.fail_next_opens(1);

        assert!(matches!(
            gate.acquire(None),
            Err(ClipboardError::ResourceBusy { .. })
        ));
        assert_eq!(clipboard.open_attempts(), 1);
    }

    #[test]
    fn invalid_owner_is_not_retried() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let gate = AccessGate::new(Arc::clone(&clipboard), quick_policy());
        let ghost = WindowId::new(0xdead).unwrap();

        assert_eq!(gate.acquire(Some(ghost)).unwrap_err(), ClipboardError::InvalidOwner(ghost));
        assert_eq!(clipboard.open_attempts(), 1);
    }

    #[test]
    fn cancelled_before_first_attempt() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let gate = AccessGate::new(Arc::clone(&clipboard), quick_policy());
        let cancel = CancelFlag::new();
        cancel.cancel();

        assert_eq!(
            gate.acquire_with(None, &cancel).unwrap_err(),
            ClipboardError::Cancelled
        );
        assert_eq!(clipboard.open_attempts(), 0);
    }

    #[test]
    fn drop_releases_on_early_return() {
        fn failing(gate: &AccessGate) -> Result<(), ClipboardError> {
            let _access = gate.acquire(None)?;
            Err(ClipboardError::Backend("boom".into()))
        }

        let clipboard = Arc::new(MemoryClipboard::new());
        let gate = AccessGate::new(Arc::clone(&clipboard), quick_policy());

        assert!(failing(&gate).is_err());
        assert!(!gate.is_held());
        assert!(gate.acquire(None).is_ok());
    }
}
