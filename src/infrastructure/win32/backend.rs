//! Clipboard primitives over user32 / kernel32

use std::ptr;

use windows_sys::Win32::Foundation::{
    GetLastError, SetLastError, ERROR_ACCESS_DENIED, ERROR_INVALID_WINDOW_HANDLE, ERROR_SUCCESS,
    HANDLE, HWND,
};
use windows_sys::Win32::System::DataExchange::{
    CloseClipboard, EmptyClipboard, EnumClipboardFormats, GetClipboardData, GetClipboardFormatNameW,
    GetClipboardOwner, GetClipboardSequenceNumber, IsClipboardFormatAvailable, OpenClipboard,
    SetClipboardData,
};
use windows_sys::Win32::System::Memory::{
    GlobalAlloc, GlobalFree, GlobalLock, GlobalSize, GlobalUnlock, GMEM_MOVEABLE,
};
use windows_sys::Win32::UI::WindowsAndMessaging::IsWindow;

use super::last_error;
use crate::application::ports::{BackendError, ClipboardBackend, Held};
use crate::domain::content::{Generation, WindowId};
use crate::domain::format::FormatId;

/// The system clipboard of the current window station
#[derive(Debug, Default)]
pub struct Win32Clipboard;

impl Win32Clipboard {
    pub fn new() -> Self {
        Self
    }
}

fn hwnd(window: Option<WindowId>) -> HWND {
    window.map_or(ptr::null_mut(), |w| w.raw() as HWND)
}

/// Movable global memory block, freed on drop unless handed to the OS
struct GlobalBuffer {
    handle: HANDLE,
}

impl GlobalBuffer {
    fn with_bytes(data: &[u8]) -> Result<Self, BackendError> {
        // SAFETY: allocation of at least one byte; the handle is checked below
        let handle = unsafe { GlobalAlloc(GMEM_MOVEABLE, data.len().max(1)) };
        if handle.is_null() {
            return Err(BackendError::Failed(last_error("GlobalAlloc")));
        }
        let buffer = Self { handle };

        // SAFETY: handle is a live movable block of at least data.len() bytes
        unsafe {
            let dst = GlobalLock(buffer.handle) as *mut u8;
            if dst.is_null() {
                return Err(BackendError::Failed(last_error("GlobalLock")));
            }
            ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len());
            GlobalUnlock(buffer.handle);
        }
        Ok(buffer)
    }

    /// Give up ownership; the clipboard frees the block from now on
    fn into_raw(self) -> HANDLE {
        let handle = self.handle;
        std::mem::forget(self);
        handle
    }
}

impl Drop for GlobalBuffer {
    fn drop(&mut self) {
        // SAFETY: we still own the block
        unsafe {
            GlobalFree(self.handle);
        }
    }
}

impl ClipboardBackend for Win32Clipboard {
    fn open(&self, owner: Option<WindowId>) -> Result<(), BackendError> {
        let window = hwnd(owner);
        // SAFETY: plain user32 calls on a possibly-null window handle
        unsafe {
            if !window.is_null() && IsWindow(window) == 0 {
                return Err(BackendError::InvalidOwner);
            }
            if OpenClipboard(window) != 0 {
                return Ok(());
            }
            match GetLastError() {
                ERROR_ACCESS_DENIED => Err(BackendError::Busy),
                ERROR_INVALID_WINDOW_HANDLE => Err(BackendError::InvalidOwner),
                code => Err(BackendError::Failed(format!("OpenClipboard failed (error {})", code))),
            }
        }
    }

    fn close(&self, _held: &Held) {
        // SAFETY: the clipboard is open on this thread
        if unsafe { CloseClipboard() } == 0 {
            tracing::warn!(error = %last_error("CloseClipboard"), "Failed to close clipboard");
        }
    }

    fn next_format(&self, _held: &Held, after: Option<FormatId>) -> Result<Option<FormatId>, BackendError> {
        // SAFETY: the clipboard is open on this thread
        unsafe {
            SetLastError(ERROR_SUCCESS);
            let next = EnumClipboardFormats(after.map_or(0, |id| id.get()));
            if next != 0 {
                return Ok(Some(FormatId::new(next)));
            }
            match GetLastError() {
                ERROR_SUCCESS => Ok(None),
                code => Err(BackendError::Failed(format!(
                    "EnumClipboardFormats failed (error {})",
                    code
                ))),
            }
        }
    }

    fn format_name(&self, id: FormatId, max_len: usize) -> Option<String> {
        let capacity = max_len.saturating_add(1).min(i32::MAX as usize);
        let mut buffer = vec![0u16; capacity];
        // SAFETY: buffer holds `capacity` units, including the terminator
        let len = unsafe { GetClipboardFormatNameW(id.get(), buffer.as_mut_ptr(), capacity as i32) };
        if len <= 0 {
            return None;
        }
        Some(String::from_utf16_lossy(&buffer[..len as usize]))
    }

    fn is_format_available(&self, _held: &Held, id: FormatId) -> bool {
        // SAFETY: membership query only
        unsafe { IsClipboardFormatAvailable(id.get()) != 0 }
    }

    fn read(&self, _held: &Held, id: FormatId) -> Result<Vec<u8>, BackendError> {
        // SAFETY: the clipboard is open on this thread, and the returned
        // handle stays valid until it closes. The block is only read while
        // locked.
        unsafe {
            let handle = GetClipboardData(id.get());
            if handle.is_null() {
                return Err(BackendError::NotPresent);
            }
            let src = GlobalLock(handle) as *const u8;
            if src.is_null() {
                return Err(BackendError::Failed(format!(
                    "format {} is not backed by global memory",
                    id
                )));
            }
            let size = GlobalSize(handle);
            let bytes = std::slice::from_raw_parts(src, size).to_vec();
            GlobalUnlock(handle);
            Ok(bytes)
        }
    }

    fn empty(&self, _held: &Held) -> Result<(), BackendError> {
        // SAFETY: the clipboard is open on this thread
        if unsafe { EmptyClipboard() } == 0 {
            return Err(BackendError::Failed(last_error("EmptyClipboard")));
        }
        Ok(())
    }

    fn write(&self, _held: &Held, id: FormatId, data: &[u8]) -> Result<(), BackendError> {
        let buffer = GlobalBuffer::with_bytes(data)?;
        // SAFETY: the clipboard is open on this thread. On success the system
        // owns the block; on failure `buffer` still does and frees it.
        let placed = unsafe { SetClipboardData(id.get(), buffer.handle) };
        if placed.is_null() {
            return Err(BackendError::Failed(last_error("SetClipboardData")));
        }
        buffer.into_raw();
        Ok(())
    }

    fn sequence_number(&self) -> Option<Generation> {
        // SAFETY: no preconditions
        match unsafe { GetClipboardSequenceNumber() } {
            0 => None,
            n => Some(Generation::new(u64::from(n))),
        }
    }

    fn owner(&self, _held: &Held) -> Option<WindowId> {
        // SAFETY: no preconditions
        WindowId::new(unsafe { GetClipboardOwner() } as isize)
    }
}
