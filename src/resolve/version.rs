//! Lenient semantic version parsing for upstream tag names

use semver::Version;

/// Parse a tag name as a semantic version
///
/// One leading `v` is stripped. Purely numeric versions with one or two
/// components are padded, so `2` reads as `2.0.0` and `v1.2` as `1.2.0`.
pub fn parse_version(tag: &str) -> Option<Version> {
    let stripped = tag.strip_prefix('v').unwrap_or(tag);
    if stripped.is_empty() {
        return None;
    }

    let split_at = stripped.find(['-', '+']).unwrap_or(stripped.len());
    let (core, suffix) = stripped.split_at(split_at);
    let components: Vec<&str> = core.split('.').collect();

    let numeric = components
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch.is_ascii_digit()));

    let normalized = match components.len() {
        1 if numeric => format!("{}.0.0{}", core, suffix),
        2 if numeric => format!("{}.0{}", core, suffix),
        _ => stripped.to_string(),
    };

    Version::parse(&normalized).ok()
}

/// Check whether a parsed version carries a pre-release component
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre.is_empty()
}
