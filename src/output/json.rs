//! JSON output formatter for machine processing

use crate::domain::{FileRewrite, LineChange};
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: JsonSummary,
    files: Vec<JsonFile<'a>>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Files processed
    files: usize,
    /// Files with at least one rewritten line
    changed_files: usize,
    /// Rewritten lines across all files
    changes: usize,
}

/// JSON representation of a single file
#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    written: bool,
    changes: &'a [LineChange],
}

impl<'a> From<&'a FileRewrite> for JsonFile<'a> {
    fn from(rewrite: &'a FileRewrite) -> Self {
        Self {
            path: rewrite.path.display().to_string(),
            written: rewrite.written,
            changes: &rewrite.changes,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, results: &[FileRewrite], writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            summary: JsonSummary {
                files: results.len(),
                changed_files: results.iter().filter(|r| r.has_changes()).count(),
                changes: results.iter().map(FileRewrite::change_count).sum(),
            },
            files: results.iter().map(JsonFile::from).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
        Ok(())
    }
}
