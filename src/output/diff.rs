//! Diff output formatter for showing changed lines

use crate::domain::FileRewrite;
use crate::output::OutputFormatter;
use colored::Colorize;
use std::io::Write;

/// Diff formatter for rewritten lines
pub struct DiffFormatter {
    /// Whether to use colors
    color: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn removed(&self, line: &str) -> String {
        let line = format!("-{}", line);
        if self.color {
            line.red().to_string()
        } else {
            line
        }
    }

    fn added(&self, line: &str) -> String {
        let line = format!("+{}", line);
        if self.color {
            line.green().to_string()
        } else {
            line
        }
    }

    fn hunk(&self, line_number: usize) -> String {
        let hunk = format!("@@ -{0},1 +{0},1 @@", line_number);
        if self.color {
            hunk.cyan().to_string()
        } else {
            hunk
        }
    }
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, results: &[FileRewrite], writer: &mut dyn Write) -> std::io::Result<()> {
        let mut total = 0;

        for rewrite in results.iter().filter(|r| r.has_changes()) {
            writeln!(writer, "--- a/{}", rewrite.path.display())?;
            writeln!(writer, "+++ b/{}", rewrite.path.display())?;

            for change in &rewrite.changes {
                writeln!(writer, "{}", self.hunk(change.line_number))?;
                writeln!(writer, "{}", self.removed(&change.before))?;
                writeln!(writer, "{}", self.added(&change.after))?;
            }

            total += rewrite.change_count();
        }

        writeln!(writer, "# {} reference(s) updated", total)?;
        Ok(())
    }
}
