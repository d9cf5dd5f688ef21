//! Ansible `requirements.yml` handling
//!
//! Accepted layouts:
//! - a top-level list of role entries
//! - a mapping with the entries under `roles`
//!
//! Each entry is reduced to a GitHub `src` (looking Galaxy shorthands such as
//! `geerlingguy.java` up first) and its latest version. Entries that cannot
//! be located or resolved are dropped from the output.

use crate::domain::Reference;
use crate::error::{AppError, ManifestError, ResolveError, SourceError};
use crate::parser::{HttpsParser, ReferenceParser};
use crate::resolve::VersionResolver;
use crate::source::RoleLookup;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A single role requirement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub src: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scm: String,
}

/// Accept numbers and booleans where a string is expected (`version: 1.0`)
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

impl Requirement {
    /// Create an output entry
    pub fn pinned(src: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// The declared source, falling back to `role` then `name`, without `git+`
    fn declared_src(&self) -> &str {
        let src = [&self.src, &self.role, &self.name]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("");
        src.strip_prefix("git+").unwrap_or(src)
    }
}

/// Parse a requirements file
///
/// Entries that are not role mappings (e.g. bare strings) are skipped.
pub fn parse_requirements(content: &str) -> Result<Vec<Requirement>, ManifestError> {
    let document: Value = serde_yaml::from_str(content)?;

    let items = match document {
        Value::Sequence(items) => items,
        Value::Mapping(mut map) => match map.remove("roles") {
            Some(Value::Sequence(items)) => items,
            _ => {
                return Err(ManifestError::UnsupportedLayout {
                    message: "expected a list of roles under 'roles'".to_string(),
                })
            }
        },
        Value::Null => Vec::new(),
        _ => {
            return Err(ManifestError::UnsupportedLayout {
                message: "expected a list or a mapping".to_string(),
            })
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_yaml::from_value::<Requirement>(item) {
            Ok(requirement) => Some(requirement),
            Err(e) => {
                debug!(error = %e, "skipping requirement entry");
                None
            }
        })
        .collect())
}

/// Render requirements back to YAML
pub fn render_requirements(requirements: &[Requirement]) -> Result<String, ManifestError> {
    Ok(serde_yaml::to_string(requirements)?)
}

/// Locates and updates Ansible role requirements
pub struct RequirementsUpdater {
    lookup: Arc<dyn RoleLookup>,
    resolver: VersionResolver,
}

impl RequirementsUpdater {
    /// Create an updater from a role lookup and a resolver
    pub fn new(lookup: Arc<dyn RoleLookup>, resolver: VersionResolver) -> Self {
        Self { lookup, resolver }
    }

    /// Resolve the repository URL of a requirement
    ///
    /// HTTP sources are used as-is (minus `.git`); `user.role` shorthands are
    /// looked up on Galaxy. Returns `None` when the source cannot be determined.
    pub async fn locate(&self, requirement: &Requirement) -> Result<Option<String>, SourceError> {
        let src = requirement.declared_src();
        if src.is_empty() {
            return Ok(None);
        }

        if src.starts_with("http") {
            return Ok(Some(src.strip_suffix(".git").unwrap_or(src).to_string()));
        }

        let Some((user, role)) = src.split_once('.') else {
            warn!(src, "not a galaxy role name");
            return Ok(None);
        };

        Ok(self
            .lookup
            .find_role_url(user, role)
            .await?
            .map(|found| found.url))
    }

    /// Resolve the latest version for a located source URL
    ///
    /// Returns `None` when the URL is not a GitHub repository or nothing can
    /// be resolved for it.
    pub async fn latest(
        &self,
        src: &str,
        current: &str,
        token: &str,
        prefer_tags: bool,
    ) -> Result<Option<String>, ResolveError> {
        let Some(parsed) = HttpsParser.try_parse(src) else {
            warn!(src, "not a GitHub repository");
            return Ok(None);
        };

        let reference = Reference::new(parsed.host, parsed.owner, parsed.repo, current, src)
            .with_token(token);

        match self.resolver.resolve(&reference, prefer_tags).await {
            Ok(resolved) => Ok(Some(resolved.version)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(src, error = %e, "dropping requirement");
                Ok(None)
            }
        }
    }

    /// Update every requirement to its latest version
    pub async fn update(
        &self,
        requirements: &[Requirement],
        token: &str,
        prefer_tags: bool,
    ) -> Result<Vec<Requirement>, AppError> {
        let mut updated = Vec::new();

        for requirement in requirements {
            let Some(src) = self.locate(requirement).await? else {
                warn!(requirement = ?requirement, "cannot determine source, dropping");
                continue;
            };

            if let Some(version) = self
                .latest(&src, &requirement.version, token, prefer_tags)
                .await?
            {
                info!(%src, from = %requirement.version, to = %version, "requirement updated");
                updated.push(Requirement::pinned(src, version));
            }
        }

        Ok(updated)
    }

    /// Parse, update and render a requirements document
    pub async fn update_document(
        &self,
        content: &str,
        token: &str,
        prefer_tags: bool,
    ) -> Result<String, AppError> {
        let requirements = parse_requirements(content)?;
        let updated = self.update(&requirements, token, prefer_tags).await?;
        Ok(render_requirements(&updated)?)
    }
}
