//! Change monitor: shared, reference-counted clipboard change notifications
//!
//! The native listener is a single registration per window, so one monitor
//! owns one message-only window and one listener and fans signals out to
//! every subscriber. The listener exists only while someone is subscribed.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::content::WindowId;
use crate::domain::monitor::{ChangeNotification, InvalidStateTransition, MonitorLifecycle, MonitorState};

use super::ports::{ChangeSink, HostError, NotificationHost};

/// Errors from the change monitor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("Change listener unavailable: {0}")]
    Host(#[from] HostError),

    #[error("{0}")]
    InvalidState(#[from] InvalidStateTransition),
}

type Callback = Arc<dyn Fn(ChangeNotification) + Send + Sync>;

struct Registry {
    lifecycle: MonitorLifecycle,
    window: Option<WindowId>,
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
    // Bumped on every start and stop; sinks from older runs are ignored
    epoch: u64,
}

struct MonitorInner {
    host: Arc<dyn NotificationHost>,
    // Serializes start/stop, including the host calls they make
    transitions: Mutex<()>,
    // Short critical sections only; the delivery path takes this one
    registry: Mutex<Registry>,
}

/// Multicast source of [`ChangeNotification`]s.
///
/// Notifications are delivered on the host's message-pump thread, in the
/// order the signals arrive. Nothing is buffered while no one is subscribed.
#[derive(Clone)]
pub struct ChangeMonitor {
    inner: Arc<MonitorInner>,
}

impl ChangeMonitor {
    pub fn new<H: NotificationHost + 'static>(host: Arc<H>) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                host,
                transitions: Mutex::new(()),
                registry: Mutex::new(Registry {
                    lifecycle: MonitorLifecycle::new(),
                    window: None,
                    subscribers: Vec::new(),
                    next_id: 1,
                    epoch: 0,
                }),
            }),
        }
    }

    pub fn state(&self) -> MonitorState {
        self.inner.registry.lock().lifecycle.state()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.lock().subscribers.len()
    }

    /// Subscribe `callback`, starting the native listener if this is the
    /// first subscriber. A failed start leaves the monitor stopped.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription, MonitorError>
    where
        F: Fn(ChangeNotification) + Send + Sync + 'static,
    {
        let _transition = self.inner.transitions.lock();

        if self.inner.registry.lock().lifecycle.is_stopped() {
            MonitorInner::start(&self.inner)?;
        }

        let mut registry = self.inner.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push((id, Arc::new(callback)));
        tracing::debug!(subscriber = id, total = registry.subscribers.len(), "Subscribed to clipboard changes");

        Ok(Subscription {
            monitor: Arc::downgrade(&self.inner),
            id,
            active: true,
        })
    }

    /// Subscribe through a channel, for consumers that need the
    /// notifications on another thread or in an async task
    pub fn subscribe_channel(
        &self,
    ) -> Result<(Subscription, mpsc::UnboundedReceiver<ChangeNotification>), MonitorError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |notification| {
            // Receiver gone means the consumer stopped listening
            let _ = tx.send(notification);
        })?;
        Ok((subscription, rx))
    }
}

impl fmt::Debug for ChangeMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeMonitor")
            .field("state", &self.state())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl MonitorInner {
    /// Caller holds `transitions`
    fn start(this: &Arc<Self>) -> Result<(), MonitorError> {
        let epoch = {
            let mut registry = this.registry.lock();
            registry.lifecycle.begin_start()?;
            registry.epoch += 1;
            registry.epoch
        };

        let weak = Arc::downgrade(this);
        let sink: ChangeSink = Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.dispatch(epoch);
            }
        });

        let registered = this.host.create_window(sink).and_then(|window| {
            match this.host.register_listener(window) {
                Ok(()) => Ok(window),
                Err(e) => {
                    this.host.destroy_window(window);
                    Err(e)
                }
            }
        });

        let mut registry = this.registry.lock();
        match registered {
            Ok(window) => {
                registry.window = Some(window);
                registry.lifecycle.complete_start()?;
                tracing::info!(%window, "Clipboard change listener started");
                Ok(())
            }
            Err(e) => {
                registry.epoch += 1;
                registry.lifecycle.abort_start()?;
                tracing::warn!(error = %e, "Clipboard change listener failed to start");
                Err(e.into())
            }
        }
    }

    /// Caller holds `transitions`
    fn stop(&self) -> Result<(), MonitorError> {
        let window = {
            let mut registry = self.registry.lock();
            registry.lifecycle.begin_stop()?;
            registry.epoch += 1;
            registry.window.take()
        };

        if let Some(window) = window {
            self.host.unregister_listener(window);
            self.host.destroy_window(window);
        }

        self.registry.lock().lifecycle.complete_stop()?;
        tracing::info!("Clipboard change listener stopped");
        Ok(())
    }

    fn unsubscribe(&self, id: u64) {
        let _transition = self.transitions.lock();

        let now_empty = {
            let mut registry = self.registry.lock();
            let before = registry.subscribers.len();
            registry.subscribers.retain(|(sid, _)| *sid != id);
            if registry.subscribers.len() == before {
                return;
            }
            tracing::debug!(subscriber = id, total = registry.subscribers.len(), "Unsubscribed from clipboard changes");
            registry.subscribers.is_empty() && registry.lifecycle.is_running()
        };

        if now_empty {
            if let Err(e) = self.stop() {
                tracing::warn!(error = %e, "Failed to stop clipboard change listener");
            }
        }
    }

    fn dispatch(&self, epoch: u64) {
        let subscribers: Vec<Callback> = {
            let registry = self.registry.lock();
            if registry.epoch != epoch || !registry.lifecycle.is_running() {
                tracing::trace!(epoch, "Ignoring change signal outside the current run");
                return;
            }
            registry.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        for callback in subscribers {
            callback(ChangeNotification);
        }
    }
}

impl Drop for MonitorInner {
    fn drop(&mut self) {
        let registry = self.registry.get_mut();
        if let Some(window) = registry.window.take() {
            self.host.unregister_listener(window);
            self.host.destroy_window(window);
        }
    }
}

/// Active subscription. Dropping it unsubscribes.
pub struct Subscription {
    monitor: Weak<MonitorInner>,
    id: u64,
    active: bool,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop receiving notifications now
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(inner) = self.monitor.upgrade() {
            inner.unsubscribe(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
