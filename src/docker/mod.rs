//! Alpine package pinning through `docker build`
//!
//! This module provides:
//! - `apk` build log scraping
//! - Dockerfile rewriting with the scraped versions
//! - The build runner used to produce the log

mod apk;
mod build;
mod dockerfile;

pub use apk::{installed_packages, pin_report, requested_packages, InstalledPackages};
pub use build::{
    dockerfile_build_args, image_tag, uncached_command, BuildOutput, BuildRunner,
    SystemBuildRunner,
};
pub use dockerfile::pin_dockerfile;

use crate::error::{AppError, DockerError};
use crate::manifest::read_manifest;
use std::path::Path;
use tracing::{debug, info};

/// Build a Dockerfile without cache and pin its `apk add` packages
///
/// Returns the rewritten Dockerfile content.
pub fn pin_dockerfile_file<R: BuildRunner + ?Sized>(
    path: &Path,
    runner: &R,
) -> Result<String, AppError> {
    if !path.is_file() {
        return Err(DockerError::DockerfileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = read_manifest(path)?;
    let tag = image_tag(content.as_bytes());
    let output = runner.run("docker", &dockerfile_build_args(path, &tag))?;

    let installed = installed_packages(&output.log());
    debug!(count = installed.len(), "apk packages installed during build");

    let pinned = pin_dockerfile(&content, &installed);
    if pinned != content {
        info!(path = %path.display(), "pinned apk packages");
    }
    Ok(pinned)
}

/// Run a user supplied build command and report pins for requested packages
pub fn apk_report<R: BuildRunner + ?Sized>(
    args: &[String],
    runner: &R,
) -> Result<String, DockerError> {
    let (program, command_args) = uncached_command(args)?;
    let output = runner.run(&program, &command_args)?;
    Ok(pin_report(&output.log()))
}
