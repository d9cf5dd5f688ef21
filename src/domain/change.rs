//! Rewrite result types
//!
//! Tracks which lines changed, per text and per file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single line that was rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineChange {
    /// 1-based line number
    pub line_number: usize,
    /// Line before the rewrite
    pub before: String,
    /// Line after the rewrite
    pub after: String,
}

impl LineChange {
    /// Creates a new LineChange
    pub fn new(line_number: usize, before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            line_number,
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Rewrite result for a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRewrite {
    /// Path to the file
    pub path: PathBuf,
    /// Full rewritten content
    pub content: String,
    /// Lines that changed, in file order
    pub changes: Vec<LineChange>,
    /// Whether the content was written back to disk
    pub written: bool,
}

impl FileRewrite {
    /// Creates a new FileRewrite
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, changes: Vec<LineChange>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            changes,
            written: false,
        }
    }

    /// Returns the number of rewritten lines
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    /// Returns true if any line was rewritten
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}
