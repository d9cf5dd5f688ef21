//! Parsed dependency reference

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTPS root of the source-control host
pub const GITHUB_HTTPS_ROOT: &str = "https://github.com";

/// SSH root of the source-control host
pub const GITHUB_SSH_ROOT: &str = "git@github.com";

/// A pinned dependency found inside a line of text
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Host root, e.g. `https://github.com` or `git@github.com`
    pub host: String,
    /// Repository owner (user or organisation)
    pub owner: String,
    /// Repository name without `.git` or `?ref=` fragments
    pub repo: String,
    /// Version token exactly as written in the source text (may be empty)
    pub current_version: String,
    /// Substring of the line that was recognised as the reference
    pub matched_text: String,
    /// Credential forwarded to the resolver
    #[serde(skip)]
    pub auth_token: String,
}

impl Reference {
    /// Creates a new reference without credentials
    pub fn new(
        host: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        current_version: impl Into<String>,
        matched_text: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            repo: repo.into(),
            current_version: current_version.into(),
            matched_text: matched_text.into(),
            auth_token: String::new(),
        }
    }

    /// Attaches the credential used for resolution (builder pattern)
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = token.into();
        self
    }

    /// Returns true if a pinned version was found
    pub fn has_version(&self) -> bool {
        !self.current_version.is_empty()
    }

    /// Returns true if a credential has been attached
    pub fn has_token(&self) -> bool {
        !self.auth_token.is_empty()
    }

    /// Returns the `owner/repo` slug
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

// Manual impl so tokens never end up in logs.
impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("host", &self.host)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("current_version", &self.current_version)
            .field("matched_text", &self.matched_text)
            .field("auth_token", &if self.has_token() { "***" } else { "" })
            .finish()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_version() {
            write!(f, "{}@{}", self.slug(), self.current_version)
        } else {
            write!(f, "{}", self.slug())
        }
    }
}
