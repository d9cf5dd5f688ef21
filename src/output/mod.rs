//! Output formatting for rewrite results
//!
//! This module provides:
//! - Text output: the rewritten content, or a note for files written in place
//! - Diff output for showing changed lines
//! - JSON output for machine processing

mod diff;
mod json;
mod text;

pub use diff::DiffFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::domain::FileRewrite;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Rewritten content
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
    /// Changed lines in diff form
    Diff,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json, diff)
    pub format: OutputFormat,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, diff: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else if diff {
            OutputFormat::Diff
        } else {
            OutputFormat::Text
        };

        Self {
            format,
            color: true,
        }
    }

    /// Set whether colors are used
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the results of a run
    fn format(&self, results: &[FileRewrite], writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::new(config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::Diff => Box::new(DiffFormatter::new(config.color)),
    }
}
