//! Rewrite progress on stderr
//!
//! Shows the file being rewritten and, when the run completes, how many
//! files and lines were touched. Single-file runs draw nothing.

use crate::domain::FileRewrite;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Tracks a multi-file rewrite run
pub struct RewriteProgress {
    bar: Option<ProgressBar>,
    files: usize,
    changed_lines: usize,
}

impl RewriteProgress {
    /// Create a tracker for `total` files; a bar is drawn only when
    /// `enabled` and there is more than one file
    pub fn new(total: usize, enabled: bool) -> Self {
        let bar = (enabled && total > 1).then(|| {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.cyan} [{pos}/{len}] {wide_msg}")
                    .expect("Invalid template")
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        Self {
            bar,
            files: 0,
            changed_lines: 0,
        }
    }

    /// Announce the file about to be rewritten
    pub fn begin(&self, path: &Path) {
        if let Some(bar) = &self.bar {
            bar.set_message(path.display().to_string());
        }
    }

    /// Count a finished file
    pub fn record(&mut self, rewrite: &FileRewrite) {
        self.files += 1;
        self.changed_lines += rewrite.change_count();
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// `N file(s), M line(s) updated`
    pub fn summary(&self) -> String {
        format!(
            "{} file(s), {} line(s) updated",
            self.files, self.changed_lines
        )
    }

    /// Leave the summary on the bar's line
    pub fn finish(self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(self.summary());
        }
    }

    /// Remove the bar after a failed run
    pub fn abandon(self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
