//! SSH clone URL parser
//!
//! Handles references of the form:
//! - `git@github.com:owner/repo.git?ref=v1.2.3`
//! - `git::git@github.com:owner/repo.git//modules/vpc?ref=v1.2.3` (Terraform sources)
//!
//! The `?ref=` suffix is mandatory, a bare clone URL is not a pin.

use crate::domain::{Reference, GITHUB_SSH_ROOT};
use crate::parser::ReferenceParser;
use regex::Regex;
use std::sync::LazyLock;

static GIT_SSH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"git@github\.com:[^\s:/"']+/[^\s/"']*?\.git(?:/[^\s?"']*)?\?ref=[^\s"'&,;)\]]*"#)
        .unwrap()
});

/// Parser for `git@github.com:owner/repo.git?ref=...` references
pub struct GitSshParser;

impl GitSshParser {
    /// Decompose a matched SSH URL
    fn decompose(matched: &str) -> Option<Reference> {
        let (_, path) = matched.split_once(':')?;
        let (owner, rest) = path.split_once('/')?;

        // repo is everything before the first `.git`
        let repo = &rest[..rest.find(".git")?];
        let (_, version) = matched.split_once('=')?;

        if owner.is_empty() || repo.is_empty() {
            return None;
        }

        Some(Reference::new(
            GITHUB_SSH_ROOT,
            owner,
            repo,
            version,
            matched,
        ))
    }
}

impl ReferenceParser for GitSshParser {
    fn try_parse(&self, line: &str) -> Option<Reference> {
        let found = GIT_SSH_RE.find(line)?;
        Self::decompose(found.as_str())
    }

    fn name(&self) -> &'static str {
        "git-ssh"
    }
}
