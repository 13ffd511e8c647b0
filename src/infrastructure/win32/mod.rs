//! Win32 clipboard adapters

mod backend;
mod host;

pub use backend::Win32Clipboard;
pub use host::Win32NotificationHost;

use windows_sys::Win32::Foundation::GetLastError;

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn last_error(call: &str) -> String {
    // SAFETY: reads thread-local error state only
    let code = unsafe { GetLastError() };
    format!("{} failed (error {})", call, code)
}
