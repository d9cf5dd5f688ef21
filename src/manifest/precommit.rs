//! pre-commit configuration updater
//!
//! Bumps the `rev` of every entry under `repos` in a
//! `.pre-commit-config.yaml`. Keys other than `rev` are carried through.

use crate::error::{AppError, ManifestError};
use crate::rewrite::LineRewriter;
use serde_yaml::Value;
use tracing::{debug, warn};

/// Update the `rev` fields of a pre-commit config document
///
/// The result starts with a `---` document marker.
pub async fn update_precommit(
    content: &str,
    rewriter: &LineRewriter,
    token: &str,
    prefer_tags: bool,
) -> Result<String, AppError> {
    let mut document: Value = serde_yaml::from_str(content).map_err(ManifestError::from)?;

    let repos = document
        .get_mut("repos")
        .and_then(Value::as_sequence_mut)
        .filter(|repos| !repos.is_empty())
        .ok_or(ManifestError::EmptyReposConfig)?;

    for entry in repos.iter_mut() {
        let Some(map) = entry.as_mapping_mut() else {
            continue;
        };
        let (Some(repo), Some(rev)) = (
            map.get("repo").and_then(Value::as_str),
            map.get("rev").and_then(Value::as_str),
        ) else {
            continue;
        };

        let prefix = format!("{}?ref=", repo);
        let rewritten = rewriter
            .rewrite_line(&format!("{}{}", prefix, rev), token, prefer_tags)
            .await?;

        let Some(latest) = rewritten.strip_prefix(&prefix) else {
            warn!(repo, rewritten = %rewritten, "repository changed while rewriting, keeping rev");
            continue;
        };

        if latest != rev {
            debug!(repo, from = rev, to = latest, "updating rev");
            let latest = latest.to_string();
            map.insert(Value::from("rev"), Value::from(latest));
        }
    }

    let body = serde_yaml::to_string(&document).map_err(ManifestError::from)?;
    Ok(format!("---\n{}", body))
}
