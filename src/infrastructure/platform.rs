//! Process-wide clipboard objects for the running platform
//!
//! The OS clipboard is one lock per session, so the process gets exactly
//! one gate and one change monitor. The first call fixes their settings.

use crate::application::{AccessGate, ChangeMonitor};
use crate::domain::config::AppConfig;
use crate::domain::error::ClipboardError;

#[cfg(windows)]
mod imp {
    use std::sync::{Arc, OnceLock};

    use super::*;
    use crate::application::FormatCatalog;
    use crate::infrastructure::win32::{Win32Clipboard, Win32NotificationHost};

    static GATE: OnceLock<AccessGate> = OnceLock::new();
    static MONITOR: OnceLock<ChangeMonitor> = OnceLock::new();

    pub fn system_gate(config: &AppConfig) -> Result<AccessGate, ClipboardError> {
        let gate = GATE.get_or_init(|| {
            let policy = config.retry_policy();
            tracing::debug!(?policy, "Creating process access gate");
            AccessGate::with_catalog(
                Arc::new(Win32Clipboard::new()),
                policy,
                FormatCatalog::new(config.max_name_len_or_default()),
            )
        });
        Ok(gate.clone())
    }

    pub fn system_monitor() -> Result<ChangeMonitor, ClipboardError> {
        let monitor = MONITOR.get_or_init(|| ChangeMonitor::new(Arc::new(Win32NotificationHost::new())));
        Ok(monitor.clone())
    }
}

#[cfg(not(windows))]
mod imp {
    use super::*;

    fn unsupported() -> ClipboardError {
        ClipboardError::Fatal(format!(
            "native clipboard access is not available on {}",
            std::env::consts::OS
        ))
    }

    pub fn system_gate(_config: &AppConfig) -> Result<AccessGate, ClipboardError> {
        Err(unsupported())
    }

    pub fn system_monitor() -> Result<ChangeMonitor, ClipboardError> {
        Err(unsupported())
    }
}

/// The process access gate. `config` only applies to the first call.
pub fn system_gate(config: &AppConfig) -> Result<AccessGate, ClipboardError> {
    imp::system_gate(config)
}

/// The process change monitor
pub fn system_monitor() -> Result<ChangeMonitor, ClipboardError> {
    imp::system_monitor()
}
