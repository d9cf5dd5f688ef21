//! GitHub Actions style pin parser
//!
//! Handles `owner/repo@version` tokens such as:
//! - `actions/checkout@v2`
//! - `jessfraz/branch-cleanup-action@master`
//!
//! There is no host prefix, the canonical GitHub root is assumed.

use crate::domain::{Reference, GITHUB_HTTPS_ROOT};
use crate::parser::ReferenceParser;
use regex::Regex;
use std::sync::LazyLock;

// The leading group keeps path segments of URLs (`/a/b@c`) and
// `owner/repo/subdir@v1` tails from matching.
static ACTIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^\w./@-])([\w-]+)/([\w-]+)@([^\s"'`,;)\]}]+)"#).unwrap()
});

/// Parser for `owner/repo@version` references
pub struct ActionsParser;

impl ReferenceParser for ActionsParser {
    fn try_parse(&self, line: &str) -> Option<Reference> {
        let caps = ACTIONS_RE.captures(line)?;
        let owner = caps.get(1)?;
        let repo = caps.get(2)?;
        let version = caps.get(3)?;

        // `actions/checkout@v2.` at the end of a sentence pins `v2`
        let pinned = version.as_str().trim_end_matches(['.', ':']);
        let end = version.start() + pinned.len();

        Some(Reference::new(
            GITHUB_HTTPS_ROOT,
            owner.as_str(),
            repo.as_str(),
            pinned,
            &line[owner.start()..end],
        ))
    }

    fn name(&self) -> &'static str {
        "actions"
    }
}
