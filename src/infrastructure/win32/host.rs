//! Message-only window host for clipboard change notifications
//!
//! Every window gets its own pump thread. The sink lives in that thread's
//! local storage and is dropped when the window is destroyed.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::mpsc;
use std::thread;

use windows_sys::Win32::Foundation::{GetLastError, ERROR_CLASS_ALREADY_EXISTS, HWND, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::System::DataExchange::{AddClipboardFormatListener, RemoveClipboardFormatListener};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DispatchMessageW, GetMessageW, IsWindow, PostMessageW,
    PostQuitMessage, RegisterClassExW, HWND_MESSAGE, MSG, WM_CLIPBOARDUPDATE, WM_CLOSE, WM_DESTROY,
    WNDCLASSEXW,
};

use super::{last_error, wide};
use crate::application::ports::{ChangeSink, HostError, NotificationHost};
use crate::domain::content::WindowId;

const CLASS_NAME: &str = "clipgate-listener";

thread_local! {
    static SINK: RefCell<Option<ChangeSink>> = const { RefCell::new(None) };
}

/// Creates one message-only window per monitor run
#[derive(Debug, Default)]
pub struct Win32NotificationHost;

impl Win32NotificationHost {
    pub fn new() -> Self {
        Self
    }
}

unsafe extern "system" fn window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_CLIPBOARDUPDATE => {
            let sink = SINK.with(|slot| slot.borrow().clone());
            if let Some(sink) = sink {
                if panic::catch_unwind(AssertUnwindSafe(|| sink())).is_err() {
                    tracing::error!("Clipboard change subscriber panicked");
                }
            }
            0
        }
        WM_DESTROY => {
            SINK.with(|slot| slot.borrow_mut().take());
            PostQuitMessage(0);
            0
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Runs on the pump thread. Returns the window as a raw handle value.
fn create_message_window() -> Result<isize, HostError> {
    let class_name = wide(CLASS_NAME);
    // SAFETY: the class struct is fully initialized and the strings outlive
    // the calls that read them
    unsafe {
        let instance = GetModuleHandleW(ptr::null());
        let mut class: WNDCLASSEXW = std::mem::zeroed();
        class.cbSize = std::mem::size_of::<WNDCLASSEXW>() as u32;
        class.lpfnWndProc = Some(window_proc);
        class.hInstance = instance;
        class.lpszClassName = class_name.as_ptr();

        if RegisterClassExW(&class) == 0 && GetLastError() != ERROR_CLASS_ALREADY_EXISTS {
            return Err(HostError::WindowCreation(last_error("RegisterClassExW")));
        }

        let hwnd = CreateWindowExW(
            0,
            class_name.as_ptr(),
            ptr::null(),
            0,
            0,
            0,
            0,
            0,
            HWND_MESSAGE,
            ptr::null_mut(),
            instance,
            ptr::null(),
        );
        if hwnd.is_null() {
            return Err(HostError::WindowCreation(last_error("CreateWindowExW")));
        }
        Ok(hwnd as isize)
    }
}

fn pump_messages() {
    // SAFETY: standard message loop over this thread's queue
    unsafe {
        let mut msg: MSG = std::mem::zeroed();
        while GetMessageW(&mut msg, ptr::null_mut(), 0, 0) > 0 {
            DispatchMessageW(&msg);
        }
    }
}

impl NotificationHost for Win32NotificationHost {
    fn create_window(&self, sink: ChangeSink) -> Result<WindowId, HostError> {
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("clipgate-pump".to_string())
            .spawn(move || {
                let created = create_message_window();
                let ok = created.is_ok();
                if ok {
                    SINK.with(|slot| *slot.borrow_mut() = Some(sink));
                }
                if tx.send(created).is_err() || !ok {
                    return;
                }
                pump_messages();
                tracing::trace!("Message pump exited");
            })
            .map_err(|e| HostError::Unavailable(e.to_string()))?;

        let raw = rx
            .recv()
            .map_err(|_| HostError::Unavailable("message pump thread died".to_string()))??;
        WindowId::new(raw).ok_or_else(|| HostError::WindowCreation("null window handle".to_string()))
    }

    fn register_listener(&self, window: WindowId) -> Result<(), HostError> {
        // SAFETY: window came from create_window
        if unsafe { AddClipboardFormatListener(window.raw() as HWND) } == 0 {
            return Err(HostError::Registration(last_error("AddClipboardFormatListener")));
        }
        Ok(())
    }

    fn unregister_listener(&self, window: WindowId) {
        // SAFETY: removing an absent listener is harmless
        if unsafe { RemoveClipboardFormatListener(window.raw() as HWND) } == 0 {
            tracing::warn!(%window, error = %last_error("RemoveClipboardFormatListener"), "Failed to remove clipboard listener");
        }
    }

    fn destroy_window(&self, window: WindowId) {
        let hwnd = window.raw() as HWND;
        // SAFETY: posting to a window that may already be gone is checked
        // with IsWindow first. The pump thread destroys it and exits.
        unsafe {
            if IsWindow(hwnd) != 0 && PostMessageW(hwnd, WM_CLOSE, 0, 0) == 0 {
                tracing::warn!(%window, error = %last_error("PostMessageW"), "Failed to close listener window");
            }
        }
    }
}
