//! Change monitor integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use clipgate::application::{AccessGate, ChangeMonitor, ContentSnapshot, QuickTextAccess};
use clipgate::domain::error::ClipboardError;
use clipgate::domain::monitor::{ChangeNotification, MonitorState};
use clipgate::domain::timing::RetryPolicy;
use clipgate::infrastructure::MemoryClipboard;

fn counting(count: &Arc<AtomicUsize>) -> impl Fn(ChangeNotification) + Send + Sync + 'static {
    let count = Arc::clone(count);
    move |_| {
        count.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn three_subscribers_share_one_listener() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let monitor = ChangeMonitor::new(Arc::clone(&clipboard));
    let barrier = Arc::new(Barrier::new(3));
    let count = Arc::new(AtomicUsize::new(0));

    let subscriptions: Vec<_> = (0..3)
        .map(|_| {
            let monitor = monitor.clone();
            let barrier = Arc::clone(&barrier);
            let callback = counting(&count);
            thread::spawn(move || {
                barrier.wait();
                monitor.subscribe(callback).unwrap()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    assert_eq!(monitor.state(), MonitorState::Running);
    assert_eq!(monitor.subscriber_count(), 3);
    assert_eq!(clipboard.listener_registrations(), 1);

    clipboard.external_set(&[("CF_TEXT", b"x\0".as_slice())]);
    assert_eq!(count.load(Ordering::SeqCst), 3);

    let mut subscriptions = subscriptions.into_iter();
    drop(subscriptions.next());
    drop(subscriptions.next());
    assert_eq!(clipboard.listener_unregistrations(), 0);
    assert_eq!(monitor.state(), MonitorState::Running);

    drop(subscriptions.next());
    assert_eq!(clipboard.listener_registrations(), 1);
    assert_eq!(clipboard.listener_unregistrations(), 1);
    assert_eq!(monitor.state(), MonitorState::Stopped);
    assert_eq!(clipboard.live_notification_windows(), 0);
}

#[test]
fn resubscribing_recreates_the_listener() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let monitor = ChangeMonitor::new(Arc::clone(&clipboard));
    let count = Arc::new(AtomicUsize::new(0));

    monitor.subscribe(counting(&count)).unwrap().unsubscribe();
    // Nothing is buffered while stopped
    clipboard.external_set(&[("CF_TEXT", b"missed\0".as_slice())]);

    let _subscription = monitor.subscribe(counting(&count)).unwrap();
    assert_eq!(clipboard.listener_registrations(), 2);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    clipboard.external_set(&[("CF_TEXT", b"seen\0".as_slice())]);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn notification_prompts_a_fresh_snapshot() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let gate = AccessGate::new(Arc::clone(&clipboard), RetryPolicy::default());
    let monitor = ChangeMonitor::new(Arc::clone(&clipboard));
    let (_subscription, mut changes) = monitor.subscribe_channel().unwrap();

    let before = ContentSnapshot::capture(&gate, None).unwrap();
    clipboard.external_set(&[("HTML Format", b"<p>hi</p>".as_slice())]);

    assert_eq!(changes.try_recv().unwrap(), ChangeNotification);
    assert!(before.is_stale().unwrap());

    let after = ContentSnapshot::capture(&gate, None).unwrap();
    assert!(after.contains("HTML Format"));
    assert!(!after.is_stale().unwrap());
}

#[test]
fn local_writes_notify_after_release() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let gate = AccessGate::new(Arc::clone(&clipboard), RetryPolicy::default());
    let monitor = ChangeMonitor::new(Arc::clone(&clipboard));
    let (_subscription, mut changes) = monitor.subscribe_channel().unwrap();

    QuickTextAccess::new(gate).put_text("hello").unwrap();

    assert!(changes.try_recv().is_ok());
    assert!(changes.try_recv().is_err());
}

#[test]
fn subscriber_can_capture_after_local_write() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let gate = AccessGate::new(Arc::clone(&clipboard), RetryPolicy::default());
    let monitor = ChangeMonitor::new(Arc::clone(&clipboard));
    let outcome: Arc<Mutex<Option<Result<usize, ClipboardError>>>> = Arc::new(Mutex::new(None));

    let _subscription = {
        let gate = gate.clone();
        let outcome = Arc::clone(&outcome);
        monitor
            .subscribe(move |_| {
                let captured = ContentSnapshot::capture(&gate, None).map(|s| s.formats().len());
                *outcome.lock().unwrap() = Some(captured);
            })
            .unwrap()
    };

    QuickTextAccess::new(gate.clone()).put_text("hello").unwrap();

    assert_eq!(*outcome.lock().unwrap(), Some(Ok(1)));
    assert!(!gate.is_held());
    assert!(!clipboard.is_open());
}

#[test]
fn dropped_receiver_does_not_break_other_subscribers() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let monitor = ChangeMonitor::new(Arc::clone(&clipboard));
    let count = Arc::new(AtomicUsize::new(0));

    let (_channel_subscription, receiver) = monitor.subscribe_channel().unwrap();
    drop(receiver);
    let _counter = monitor.subscribe(counting(&count)).unwrap();

    clipboard.external_set(&[("CF_TEXT", b"x\0".as_slice())]);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
