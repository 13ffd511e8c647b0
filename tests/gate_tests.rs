//! Access gate integration tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration as StdDuration, Instant};

use clipgate::application::{AccessGate, CancelFlag};
use clipgate::domain::error::ClipboardError;
use clipgate::domain::timing::{Backoff, Duration, RetryPolicy};
use clipgate::infrastructure::MemoryClipboard;

fn policy(interval_ms: u64, deadline_ms: u64, backoff: Backoff) -> RetryPolicy {
    RetryPolicy::new(Duration::from_millis(interval_ms), Duration::from_millis(deadline_ms), backoff)
}

#[test]
fn concurrent_accesses_never_overlap() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let gate = AccessGate::new(Arc::clone(&clipboard), policy(1, 5_000, Backoff::Fixed));
    let inside = Arc::new(AtomicBool::new(false));
    let overlaps = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..2)
        .map(|_| {
            let gate = gate.clone();
            let inside = Arc::clone(&inside);
            let overlaps = Arc::clone(&overlaps);
            thread::spawn(move || {
                for _ in 0..50 {
                    let access = gate.acquire(None).unwrap();
                    if inside.swap(true, Ordering::SeqCst) {
                        overlaps.fetch_add(1, Ordering::SeqCst);
                    }
                    thread::sleep(StdDuration::from_micros(200));
                    inside.store(false, Ordering::SeqCst);
                    access.release();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert!(!clipboard.is_open());
}

#[test]
fn succeeds_on_third_attempt_within_budget() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let budget = policy(10, 500, Backoff::Linear);
    let gate = AccessGate::new(Arc::clone(&clipboard), budget);
    clipboard.fail_next_opens(2);

    let started = Instant::now();
    let access = gate.acquire(None).unwrap();
    let elapsed = started.elapsed();
    access.release();

    assert_eq!(clipboard.open_attempts(), 3);
    assert!(elapsed <= budget.deadline().as_std());
}

#[test]
fn released_exactly_once_on_every_exit_path() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let gate = AccessGate::new(Arc::clone(&clipboard), policy(1, 50, Backoff::Fixed));

    // explicit release
    gate.acquire(None).unwrap().release();
    // drop
    drop(gate.acquire(None).unwrap());
    // unwinding
    let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _access = gate.acquire(None).unwrap();
        panic!("boom");
    }));
    assert!(unwound.is_err());

    assert!(!gate.is_held());
    assert!(!clipboard.is_open());
    assert!(gate.acquire(None).is_ok());
}

#[test]
fn busy_surfaces_after_deadline() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let gate = AccessGate::new(Arc::clone(&clipboard), policy(5, 40, Backoff::Linear));
    let _hold = clipboard.hold_externally();

    let started = Instant::now();
    let err = gate.acquire(None).unwrap_err();

    assert!(matches!(err, ClipboardError::ResourceBusy { .. }));
    assert!(err.is_retryable());
    // Deadline is honored without overshooting by a whole backoff step
    assert!(started.elapsed() < StdDuration::from_millis(40 + 100));
}

#[test]
fn cancellation_stops_retrying_promptly() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let gate = AccessGate::new(Arc::clone(&clipboard), policy(200, 10_000, Backoff::Fixed));
    let _hold = clipboard.hold_externally();
    let cancel = CancelFlag::new();

    let canceller = {
        let cancel = cancel.clone();
        thread::spawn(move || {
            thread::sleep(StdDuration::from_millis(30));
            cancel.cancel();
        })
    };

    let started = Instant::now();
    let err = gate.acquire_with(None, &cancel).unwrap_err();
    canceller.join().unwrap();

    assert_eq!(err, ClipboardError::Cancelled);
    assert!(started.elapsed() < StdDuration::from_millis(200));
    assert!(!gate.is_held());
}

#[test]
fn live_owner_window_is_accepted() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let gate = AccessGate::new(Arc::clone(&clipboard), policy(1, 20, Backoff::Fixed));
    let owner = clipboard.create_owner_window();

    let access = gate.acquire(Some(owner)).unwrap();
    access.empty().unwrap();
    assert_eq!(access.owner(), Some(owner));
}
