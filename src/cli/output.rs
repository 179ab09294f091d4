use crate::error::{DeskError, Result};
use colored::Colorize;
use serde::Serialize;

/// Output formatter for CLI messages and data
///
/// Messages go to stderr so that stdout only carries data (tables, JSON,
/// exports).
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    #[must_use]
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { json }
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print a value as pretty JSON on stdout
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(|e| {
            DeskError::SerializationError(format!("Failed to render JSON output: {e}"))
        })?;
        println!("{rendered}");
        Ok(())
    }

    /// Print a data line on stdout
    pub fn line(&self, text: &str) {
        println!("{text}");
    }

    pub fn success(&self, message: &str) {
        if !self.json {
            eprintln!("{} {message}", "✓".green().bold());
        }
    }

    pub fn info(&self, message: &str) {
        if !self.json {
            eprintln!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {message}", "warning:".yellow().bold());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", "error:".red().bold());
    }
}
