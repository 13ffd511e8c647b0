//! Plain-text access integration tests

use std::sync::Arc;

use clipgate::application::ports::TextClipboard;
use clipgate::application::{AccessGate, ContentSnapshot, QuickTextAccess};
use clipgate::domain::content::decode_unicode_text;
use clipgate::domain::error::ClipboardError;
use clipgate::domain::timing::RetryPolicy;
use clipgate::infrastructure::{GateTextClipboard, MemoryClipboard};

fn text_over(clipboard: &Arc<MemoryClipboard>) -> QuickTextAccess {
    QuickTextAccess::new(AccessGate::new(Arc::clone(clipboard), RetryPolicy::default()))
}

#[test]
fn put_then_get_round_trips() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let text = text_over(&clipboard);

    text.put_text("hello").unwrap();
    assert_eq!(text.get_text().unwrap(), "hello");
}

#[test]
fn put_text_is_visible_to_snapshots() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let text = text_over(&clipboard);
    text.put_text("snap").unwrap();

    let snapshot = ContentSnapshot::capture(text.gate(), None).unwrap();
    let payload = snapshot.get("UNICODETEXT").unwrap();
    assert_eq!(decode_unicode_text(payload.bytes()), "snap");
}

#[test]
fn get_text_from_empty_clipboard() {
    let clipboard = Arc::new(MemoryClipboard::new());
    assert!(text_over(&clipboard).get_text().unwrap_err().is_negative_result());
}

#[test]
fn put_text_fails_busy_without_writing() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let text = QuickTextAccess::new(AccessGate::new(Arc::clone(&clipboard), RetryPolicy::no_retry()));
    let generation = clipboard.current_generation();

    {
        let _hold = clipboard.hold_externally();
        assert!(matches!(
            text.put_text("nope"),
            Err(ClipboardError::ResourceBusy { .. })
        ));
    }
    assert_eq!(clipboard.current_generation(), generation);
}

#[test]
fn failed_write_releases_the_clipboard() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let text = text_over(&clipboard);
    clipboard.fail_next_write();

    assert!(matches!(text.put_text("lost"), Err(ClipboardError::Backend(_))));
    assert!(!text.gate().is_held());
    assert!(!clipboard.is_open());

    text.put_text("kept").unwrap();
    assert_eq!(text.get_text().unwrap(), "kept");
}

#[tokio::test]
async fn gate_text_clipboard_from_async_code() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let adapter = GateTextClipboard::new(text_over(&clipboard));

    adapter.copy("from a task").await.unwrap();
    assert_eq!(adapter.paste().await.unwrap(), "from a task");
}

#[tokio::test]
async fn boxed_text_clipboard_delegates() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let boxed: Box<dyn TextClipboard> = Box::new(GateTextClipboard::new(text_over(&clipboard)));

    boxed.copy("boxed").await.unwrap();
    assert_eq!(boxed.paste().await.unwrap(), "boxed");
}
