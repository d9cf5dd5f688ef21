//! Core domain models for zoi
//!
//! - References parsed out of a line of text
//! - Resolved versions and their origin
//! - Per-file rewrite results

mod change;
mod reference;
mod resolved;

pub use change::{FileRewrite, LineChange};
pub use reference::{Reference, GITHUB_HTTPS_ROOT, GITHUB_SSH_ROOT};
pub use resolved::{ResolvedVersion, VersionOrigin};
