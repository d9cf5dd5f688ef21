//! Upstream sources for version information
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - GitHub releases and tags listing
//! - Ansible Galaxy role lookup

mod client;
mod galaxy;
mod github;

pub use client::{next_page_url, HttpClient};
pub use galaxy::{GalaxyClient, GalaxyRole, RoleLookup};
pub use github::GitHubSource;

use crate::error::SourceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Tag the release points at
    pub tag_name: String,
}

impl Release {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
        }
    }
}

/// A lightweight tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Trait for sources of releases and tags
///
/// Implementations return the full list, flattening any pagination.
/// The token is passed on every call; an empty token means unauthenticated.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Get the source name
    fn source_name(&self) -> &'static str;

    /// List all releases of `owner/repo`
    async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        token: &str,
    ) -> Result<Vec<Release>, SourceError>;

    /// List all tags of `owner/repo`, in the order the host returns them
    async fn list_tags(&self, owner: &str, repo: &str, token: &str)
        -> Result<Vec<Tag>, SourceError>;
}
