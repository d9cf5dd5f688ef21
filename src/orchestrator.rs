//! Orchestrator for rewriting a set of files
//!
//! This module provides:
//! - Input validation before any network traffic
//! - Sequential rewriting of each file, line by line
//! - Optional in-place writes
//! - Progress display for multi-file runs

use crate::domain::FileRewrite;
use crate::error::{AppError, ConfigError, SourceError};
use crate::manifest::{read_manifest, write_manifest};
use crate::progress::RewriteProgress;
use crate::resolve::VersionResolver;
use crate::rewrite::LineRewriter;
use crate::source::{GitHubSource, HttpClient, ReleaseSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Options controlling a rewrite run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// GitHub token, empty when none was found
    pub token: String,
    /// Choose the latest tag over the latest release
    pub prefer_tags: bool,
    /// Write rewritten content back to the files
    pub inplace: bool,
    /// Show a progress bar
    pub show_progress: bool,
}

/// Reject missing input files before doing any work
pub fn check_inputs(files: &[PathBuf]) -> Result<(), ConfigError> {
    if files.is_empty() {
        return Err(ConfigError::NoInput);
    }

    match files.iter().find(|path| !path.is_file()) {
        Some(missing) => Err(ConfigError::file_not_found(missing)),
        None => Ok(()),
    }
}

/// Orchestrator for the file rewriting workflow
pub struct Orchestrator {
    rewriter: LineRewriter,
    options: RunOptions,
}

impl Orchestrator {
    /// Create an orchestrator against the public GitHub API
    pub fn new(options: RunOptions) -> Result<Self, SourceError> {
        let source = GitHubSource::new(HttpClient::new()?);
        Ok(Self::with_source(options, Arc::new(source)))
    }

    /// Create an orchestrator with a custom release source (for testing)
    pub fn with_source(options: RunOptions, source: Arc<dyn ReleaseSource>) -> Self {
        Self {
            rewriter: LineRewriter::new(VersionResolver::new(source)),
            options,
        }
    }

    /// Rewrite one file, writing it back if requested
    pub async fn rewrite_file(&self, path: &Path) -> Result<FileRewrite, AppError> {
        debug!(path = %path.display(), "rewriting file");
        let original = read_manifest(path)?;

        let result = self
            .rewriter
            .rewrite_text(&original, &self.options.token, self.options.prefer_tags)
            .await?;

        let mut rewrite = FileRewrite::new(path, result.content, result.changes);

        if self.options.inplace && rewrite.has_changes() {
            write_manifest(path, &rewrite.content)?;
            rewrite.written = true;
            info!(
                path = %path.display(),
                changes = rewrite.change_count(),
                "file updated"
            );
        }

        Ok(rewrite)
    }

    /// Rewrite every file in order
    ///
    /// The first fatal error aborts the run; files already written stay written.
    pub async fn run(&self, files: &[PathBuf]) -> Result<Vec<FileRewrite>, AppError> {
        check_inputs(files)?;

        let mut progress = RewriteProgress::new(files.len(), self.options.show_progress);

        let mut results = Vec::with_capacity(files.len());
        for path in files {
            progress.begin(path);
            match self.rewrite_file(path).await {
                Ok(rewrite) => {
                    progress.record(&rewrite);
                    results.push(rewrite);
                }
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            }
        }
        debug!(summary = %progress.summary(), "run complete");
        progress.finish();

        Ok(results)
    }
}
