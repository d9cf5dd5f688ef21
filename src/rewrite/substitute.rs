//! Version substitution inside a matched reference

use crate::domain::Reference;

/// Strip one leading `v`
fn strip_v(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Rewrite the matched text of a reference to carry `new_version`
///
/// Every occurrence of the current version is replaced first. A second pass
/// then replaces the bare (`v`-less) old version with the bare new one, which
/// catches asset names such as `gh_1.7.0_linux.tar.gz`. The second pass is
/// skipped when the bare old version is a single character found inside the
/// new version, so `v2` -> `v2.3.1` does not become `v2.3.1.3.1`.
pub fn substitute(reference: &Reference, new_version: &str) -> String {
    let old = reference.current_version.as_str();
    if old.is_empty() {
        return reference.matched_text.clone();
    }

    let rewritten = reference.matched_text.replace(old, new_version);

    let old_bare = strip_v(old);
    let new_bare = strip_v(new_version);
    if old_bare.is_empty() {
        return rewritten;
    }

    if !new_version.contains(old_bare) || old_bare.len() != 1 {
        rewritten.replace(old_bare, new_bare)
    } else {
        rewritten
    }
}
