//! Command runners for the clipgate binary

use std::io;
use std::process::ExitCode;

use base64::Engine as _;
use serde_json::json;
use thiserror::Error;
use tokio::io::AsyncReadExt;

use crate::application::ports::{ConfigStore, TextClipboard};
use crate::application::{ContentSnapshot, MonitorError};
use crate::domain::config::AppConfig;
use crate::domain::error::ClipboardError;
use crate::infrastructure::{create_text_clipboard, system_gate, system_monitor, XdgConfigStore};

use super::args::TextAction;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;
/// Clipboard was busy or changed underneath us; trying again may work
pub const EXIT_RETRYABLE: u8 = 3;

/// Errors from running a clipboard command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CommandError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Clipboard(e) if e.is_retryable() => EXIT_RETRYABLE,
            _ => EXIT_ERROR,
        }
    }
}

/// Turn a command result into an exit code, reporting any error
pub fn finish(result: Result<(), CommandError>, presenter: &Presenter) -> ExitCode {
    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            presenter.error(&e.to_string());
            if e.exit_code() == EXIT_RETRYABLE {
                presenter.info("The clipboard is contended; try again");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// List the formats currently on the clipboard
pub async fn run_formats(config: &AppConfig, json: bool, presenter: &Presenter) -> Result<(), CommandError> {
    let gate = system_gate(config)?;
    let snapshot = tokio::task::spawn_blocking(move || ContentSnapshot::capture(&gate, None)).await??;

    if json {
        let formats: Vec<_> = snapshot
            .formats()
            .iter()
            .map(|f| json!({ "id": f.id().get(), "name": f.name(), "kind": f.kind().label() }))
            .collect();
        let document = json!({
            "generation": snapshot.generation().get(),
            "owner": snapshot.owner().map(|w| w.to_string()),
            "complete": snapshot.is_complete(),
            "formats": formats,
        });
        presenter.output(&serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    presenter.snapshot_header(snapshot.generation(), snapshot.owner());
    for descriptor in snapshot.formats() {
        presenter.format_row(descriptor);
    }
    if !snapshot.is_complete() {
        presenter.warn("Enumeration stopped early; the list may be incomplete");
    }
    Ok(())
}

/// Print the payload of one format
pub async fn run_get(
    config: &AppConfig,
    format: String,
    as_base64: bool,
    allow_stale: bool,
    presenter: &Presenter,
) -> Result<(), CommandError> {
    let gate = system_gate(config)?;
    let payload = tokio::task::spawn_blocking(move || {
        let snapshot = ContentSnapshot::capture(&gate, None)?;
        snapshot.get(&format)
    })
    .await??;

    let bytes = if allow_stale {
        if payload.is_stale() {
            presenter.warn("Clipboard changed while reading; payload may be from newer content");
        }
        payload.into_bytes()
    } else {
        payload.require_fresh()?
    };

    if as_base64 {
        presenter.output(&base64::engine::general_purpose::STANDARD.encode(&bytes));
    } else {
        presenter.output_bytes(&bytes)?;
    }
    Ok(())
}

/// Read or write plain text
pub async fn run_text(config: &AppConfig, action: TextAction, presenter: &Presenter) -> Result<(), CommandError> {
    let clipboard = create_text_clipboard(config);

    match action {
        TextAction::Get => {
            let text = clipboard.paste().await?;
            presenter.output(&text);
        }
        TextAction::Put { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    tokio::io::stdin().read_to_string(&mut buffer).await?;
                    buffer
                }
            };
            clipboard.copy(&text).await?;
            presenter.success(&format!("Copied {} characters", text.chars().count()));
        }
    }
    Ok(())
}

/// Print a line per clipboard change until Ctrl-C or `count` changes
pub async fn run_watch(config: &AppConfig, count: Option<u64>, presenter: &Presenter) -> Result<(), CommandError> {
    let monitor = system_monitor()?;
    let gate = system_gate(config).ok();
    let (subscription, mut changes) = monitor.subscribe_channel()?;
    presenter.info("Watching the clipboard (Ctrl-C to stop)");

    let mut seen = 0u64;
    loop {
        tokio::select! {
            change = changes.recv() => {
                if change.is_none() {
                    break;
                }
                seen += 1;
                presenter.change(seen, gate.as_ref().and_then(|g| g.generation()));
                if count.is_some_and(|limit| seen >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Interrupted");
                break;
            }
        }
    }

    subscription.unsubscribe();
    Ok(())
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}
