//! Dockerfile `apk add` pinning

use crate::docker::apk::{ApkState, InstalledPackages};
use regex::Regex;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Returns true if the line opens a `RUN` instruction
fn starts_run(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case("RUN"))
}

/// Returns true if the instruction continues on the next line
fn continues(line: &str) -> bool {
    line.trim_end().ends_with('\\')
}

/// Pin every unpinned `apk add` package in `RUN` instructions
///
/// Packages are pinned to the version found in `installed`; packages missing
/// from it, flags and already pinned packages are left alone. Whitespace,
/// comments and line continuations are preserved.
pub fn pin_dockerfile(content: &str, installed: &InstalledPackages) -> String {
    let mut out = Vec::new();
    let mut in_run = false;
    let mut continued = false;
    let mut state = ApkState::Idle;

    for line in content.split('\n') {
        if !continued {
            in_run = starts_run(line);
            state = ApkState::Idle;
        }
        continued = continues(line);

        if !in_run || line.trim_start().starts_with('#') {
            out.push(line.to_string());
            continue;
        }

        let mut pinned = String::with_capacity(line.len());
        let mut last = 0;
        for token in TOKEN_RE.find_iter(line) {
            let Some(package) = state.advance(token.as_str()) else {
                continue;
            };
            let Some(version) = installed.get(package) else {
                continue;
            };
            let end = token.start() + package.len();
            pinned.push_str(&line[last..end]);
            pinned.push('=');
            pinned.push_str(version);
            last = end;
        }
        pinned.push_str(&line[last..]);
        out.push(pinned);
    }

    out.join("\n")
}
