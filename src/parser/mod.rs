//! Reference parsers for pinned dependency mentions
//!
//! Each parser recognises one way a GitHub dependency and its pinned
//! version can be written inside a line of text:
//! - SSH clone URLs with a `?ref=` suffix (`git@github.com:owner/repo.git?ref=v1`)
//! - HTTPS URLs (`https://github.com/owner/repo/releases/download/v1/asset`)
//! - GitHub Actions style pins (`owner/repo@v1`)
//!
//! Parsers are tried in that order; the first reference carrying a
//! version wins.

mod actions;
mod git_ssh;
mod https;

pub use actions::ActionsParser;
pub use git_ssh::GitSshParser;
pub use https::{points_at_latest, HttpsParser};

use crate::domain::Reference;

/// Trait for recognising a reference inside a line
pub trait ReferenceParser: Send + Sync {
    /// Try to find a reference in the line
    fn try_parse(&self, line: &str) -> Option<Reference>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Returns the parsers in priority order
pub fn default_parsers() -> Vec<Box<dyn ReferenceParser>> {
    vec![
        Box::new(GitSshParser),
        Box::new(HttpsParser),
        Box::new(ActionsParser),
    ]
}

/// Returns the first reference with a pinned version found by `parsers`
pub fn parse_with(parsers: &[Box<dyn ReferenceParser>], line: &str) -> Option<Reference> {
    parsers
        .iter()
        .filter_map(|parser| parser.try_parse(line))
        .find(Reference::has_version)
}

/// Parse a line with the default parsers
pub fn parse_line(line: &str) -> Option<Reference> {
    parse_with(&default_parsers(), line)
}
