//! CLI argument definitions using Clap

use clap::{ArgAction, Parser, Subcommand};

/// clipgate - coordinated access to the system clipboard
#[derive(Parser, Debug)]
#[command(name = "clipgate")]
#[command(version)]
#[command(about = "Inspect, read, write and watch the system clipboard")]
#[command(long_about = None)]
pub struct Cli {
    /// Total time to keep retrying a busy clipboard (e.g., 500ms, 1s)
    #[arg(long, value_name = "TIME", global = true)]
    pub retry_deadline: Option<String>,

    /// Pause between clipboard open attempts (e.g., 10ms)
    #[arg(long, value_name = "TIME", global = true)]
    pub retry_interval: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the formats currently on the clipboard
    Formats {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the payload of one format
    Get {
        /// Format name (e.g., CF_UNICODETEXT, TEXT, "HTML Format")
        format: String,
        /// Print base64 instead of raw bytes
        #[arg(long)]
        base64: bool,
        /// Accept a payload read after the clipboard changed
        #[arg(long)]
        allow_stale: bool,
    },
    /// Read or write plain text
    Text {
        #[command(subcommand)]
        action: TextAction,
    },
    /// Print a line for every clipboard change
    Watch {
        /// Stop after this many changes
        #[arg(short = 'n', long, value_name = "N")]
        count: Option<u64>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Text subcommands
#[derive(Subcommand, Debug)]
pub enum TextAction {
    /// Print the clipboard text
    Get,
    /// Replace the clipboard with text (reads stdin when omitted)
    Put {
        /// Text to write
        text: Option<String>,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "gate.retry_interval",
    "gate.retry_deadline",
    "gate.backoff",
    "catalog.max_name_len",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
