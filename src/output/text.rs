//! Text output formatter
//!
//! A single file is echoed as-is so the output can be redirected into a
//! new file. Several files are separated by `==> path <==` headers. Files
//! already written in place are reported with a one-line note instead.

use crate::domain::FileRewrite;
use crate::output::OutputFormatter;
use colored::Colorize;
use std::io::Write;

/// Text formatter for rewritten content
pub struct TextFormatter {
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Note printed for files written in place
    fn written_note(&self, rewrite: &FileRewrite) -> String {
        let note = format!(
            "{}: {} line(s) updated",
            rewrite.path.display(),
            rewrite.change_count()
        );
        if self.color {
            note.green().to_string()
        } else {
            note
        }
    }

    /// Header separating files
    fn header(&self, rewrite: &FileRewrite) -> String {
        let header = format!("==> {} <==", rewrite.path.display());
        if self.color {
            header.bold().to_string()
        } else {
            header
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, results: &[FileRewrite], writer: &mut dyn Write) -> std::io::Result<()> {
        let with_headers = results.len() > 1;

        for rewrite in results {
            if rewrite.written {
                writeln!(writer, "{}", self.written_note(rewrite))?;
                continue;
            }

            if with_headers {
                writeln!(writer, "{}", self.header(rewrite))?;
            }
            write!(writer, "{}", rewrite.content)?;
            if with_headers && !rewrite.content.ends_with('\n') {
                writeln!(writer)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineChange;

    fn render(results: &[FileRewrite]) -> String {
        let mut out = Vec::new();
        TextFormatter::new(false).format(results, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_file_verbatim() {
        let rewrite = FileRewrite::new("Dockerfile", "FROM alpine\nRUN true", Vec::new());
        assert_eq!(render(&[rewrite]), "FROM alpine\nRUN true");
    }

    #[test]
    fn test_multiple_files_with_headers() {
        let results = vec![
            FileRewrite::new("a.txt", "one\n", Vec::new()),
            FileRewrite::new("b.txt", "two", Vec::new()),
        ];
        assert_eq!(render(&results), "==> a.txt <==\none\n==> b.txt <==\ntwo\n");
    }

    #[test]
    fn test_written_file_note() {
        let mut rewrite = FileRewrite::new(
            "workflow.yml",
            "uses: o/r@v2\n",
            vec![LineChange::new(1, "uses: o/r@v1", "uses: o/r@v2")],
        );
        rewrite.written = true;
        assert_eq!(render(&[rewrite]), "workflow.yml: 1 line(s) updated\n");
    }
}
