//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;

use crate::domain::content::{Generation, WindowId};
use crate::domain::format::FormatDescriptor;

/// Presenter for CLI output formatting.
/// Status goes to stderr, payloads to stdout.
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Output raw bytes to stdout
    pub fn output_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()
    }

    /// Print the snapshot header for a format listing
    pub fn snapshot_header(&self, generation: Generation, owner: Option<WindowId>) {
        let owner = owner.map_or_else(|| "none".to_string(), |w| w.to_string());
        eprintln!(
            "{} generation {} · owner {}",
            "●".cyan(),
            generation.to_string().bold(),
            owner
        );
    }

    /// Print one row of a format listing
    pub fn format_row(&self, descriptor: &FormatDescriptor) {
        println!("{}", self.format_line(descriptor));
    }

    fn format_line(&self, descriptor: &FormatDescriptor) -> String {
        format!(
            "{:>6}  {:<11} {}",
            descriptor.id().get(),
            descriptor.kind().label().dimmed(),
            descriptor.name()
        )
    }

    /// Print a clipboard change line
    pub fn change(&self, index: u64, generation: Option<Generation>) {
        let generation = generation.map_or_else(|| "?".to_string(), |g| g.to_string());
        println!("{} change #{} (generation {})", "↻".cyan(), index, generation);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
