//! HTTPS GitHub URL parser
//!
//! Handles references of the form:
//! - Release assets: `https://github.com/owner/repo/releases/download/v1.2.3/asset.tar.gz`
//! - Ref pins: `https://github.com/owner/repo?ref=v1.2.3`
//!
//! URLs pointing at `releases/latest` always track the newest release and
//! are never treated as pins.

use crate::domain::Reference;
use crate::parser::ReferenceParser;
use regex::Regex;
use std::sync::LazyLock;

static GITHUB_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https://github\.com(?:/[^\s"'<>`()\[\]{}]*)?"#).unwrap());

/// Path marker for URLs that always resolve to the newest release
const LATEST_MARKER: &str = "releases/latest";

/// Parser for `https://github.com/...` references
pub struct HttpsParser;

/// Returns true if the line holds a GitHub URL pointing at `releases/latest`
pub fn points_at_latest(line: &str) -> bool {
    github_urls(line).any(|url| url.contains(LATEST_MARKER))
}

/// All GitHub URLs in a line, with trailing sentence punctuation removed
fn github_urls(line: &str) -> impl Iterator<Item = &str> {
    GITHUB_URL_RE
        .find_iter(line)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':']))
}

impl HttpsParser {
    /// Decompose a single GitHub URL
    fn parse_url(url: &str) -> Option<Reference> {
        if url.contains(LATEST_MARKER) {
            return None;
        }

        let parts: Vec<&str> = url.split('/').collect();
        if parts.len() < 5 {
            return None;
        }

        let owner = parts[3];
        let repo = sanitise_repo(parts[4]);
        if owner.is_empty() || repo.is_empty() {
            return None;
        }

        Some(Reference::new(
            format!("{}//{}", parts[0], parts[2]),
            owner,
            repo,
            release_from_parts(&parts),
            url,
        ))
    }
}

impl ReferenceParser for HttpsParser {
    fn try_parse(&self, line: &str) -> Option<Reference> {
        let mut first = None;

        for url in github_urls(line) {
            let Some(reference) = Self::parse_url(url) else {
                continue;
            };
            if reference.has_version() {
                return Some(reference);
            }
            first.get_or_insert(reference);
        }

        first
    }

    fn name(&self) -> &'static str {
        "https"
    }
}

/// Strip `?ref=...` and a trailing `.git` from a repository segment
fn sanitise_repo(repo: &str) -> &str {
    let repo = match repo.find("?ref") {
        Some(pos) if pos > 0 => &repo[..pos],
        _ => repo,
    };
    repo.strip_suffix(".git").unwrap_or(repo)
}

/// Extract the pinned version from the URL path segments
fn release_from_parts<'a>(parts: &[&'a str]) -> &'a str {
    if parts.len() > 7 && parts[5] == "releases" && parts[6] == "download" {
        return parts[7];
    }

    if parts.windows(2).any(|w| w == ["releases", "download"]) {
        return "";
    }

    parts
        .last()
        .copied()
        .and_then(|segment| segment.split_once('?'))
        .and_then(|(_, query)| query.split('&').find_map(|pair| pair.strip_prefix("ref=")))
        .unwrap_or("")
}
