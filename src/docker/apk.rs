//! Alpine `apk` build log scraping

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// Classic builder prints `(1/3) Installing htop (2.2.0-r0)`; BuildKit
// prefixes the same line with `#5 0.512 `.
static INSTALLING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#\d+ [\d.]+ )?\(\d+/\d+\) Installing (\S+) \((.+)\)$").unwrap()
});

/// Package name to installed version, as reported by `apk`
pub type InstalledPackages = BTreeMap<String, String>;

/// Collect every `Installing <name> (<version>)` line from a build log
pub fn installed_packages(log: &str) -> InstalledPackages {
    log.lines()
        .filter_map(|line| INSTALLING_RE.captures(line.trim_end()))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Position within an `apk add` command while scanning tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApkState {
    Idle,
    SawApk,
    Adding,
}

/// Returns true for shell tokens that end the current command
pub(crate) fn is_separator(token: &str) -> bool {
    ["&&", "||", ";", "|"].iter().any(|sep| token.starts_with(sep))
}

/// Returns the package name if the token is an unpinned package argument
pub(crate) fn unpinned_package(token: &str) -> Option<&str> {
    let name = token.trim_end_matches(';');
    if name.is_empty()
        || name.starts_with(['-', '.', '$'])
        || name.contains(['=', '<', '>', '~'])
        || name == "\\"
    {
        return None;
    }
    Some(name)
}

impl ApkState {
    /// Advance over one token, returning the package it names if any
    pub(crate) fn advance<'a>(&mut self, token: &'a str) -> Option<&'a str> {
        if is_separator(token) {
            *self = ApkState::Idle;
            return None;
        }

        let package = match *self {
            ApkState::Idle => {
                if token == "apk" {
                    *self = ApkState::SawApk;
                }
                None
            }
            ApkState::SawApk => {
                if token == "add" {
                    *self = ApkState::Adding;
                } else if !token.starts_with('-') {
                    *self = ApkState::Idle;
                }
                None
            }
            ApkState::Adding => unpinned_package(token),
        };

        if token.ends_with(';') {
            *self = ApkState::Idle;
        }
        package
    }
}

/// Packages explicitly requested through `apk add` in a piece of text
pub fn requested_packages(text: &str) -> Vec<String> {
    let mut state = ApkState::Idle;
    let mut packages = Vec::new();

    for line in text.lines() {
        for token in line.split_whitespace() {
            if let Some(package) = state.advance(token) {
                packages.push(package.to_string());
            }
        }
        if !line.trim_end().ends_with('\\') {
            state = ApkState::Idle;
        }
    }

    packages
}

/// Build a sorted `name=version` report for the unpinned packages requested
/// in a build log
pub fn pin_report(log: &str) -> String {
    let installed = installed_packages(log);
    let mut pins: Vec<String> = requested_packages(log)
        .into_iter()
        .filter_map(|name| {
            installed
                .get(&name)
                .map(|version| format!("{}={}", name, version))
        })
        .collect();

    pins.sort();
    pins.dedup();
    pins.join("\n")
}
