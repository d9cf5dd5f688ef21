//! Next-version resolution for parsed references
//!
//! This module provides:
//! - Lenient semantic version parsing of upstream tag names
//! - Release and tag selection
//! - The resolver that reconciles both sources

mod version;

pub use version::{is_prerelease, parse_version};

use crate::domain::{Reference, ResolvedVersion};
use crate::error::{ResolveError, SourceError};
use crate::source::{Release, ReleaseSource, Tag};
use semver::Version;
use std::sync::Arc;
use tracing::{debug, warn};

/// Pick the greatest semantic version among releases
///
/// Entries that do not parse are skipped. Ties keep the first one seen.
/// The upstream tag name is returned unchanged.
pub fn select_release(releases: &[Release]) -> Option<&str> {
    let mut best: Option<(Version, &str)> = None;

    for release in releases {
        let Some(version) = parse_version(&release.tag_name) else {
            debug!(tag = %release.tag_name, "skipping non-semver release");
            continue;
        };
        let is_greater = best.as_ref().map_or(true, |(current, _)| version > *current);
        if is_greater {
            best = Some((version, release.tag_name.as_str()));
        }
    }

    best.map(|(_, tag)| tag)
}

/// Pick the first stable semantic version tag in listing order
pub fn select_tag(tags: &[Tag]) -> Option<&str> {
    tags.iter()
        .find(|tag| parse_version(&tag.name).is_some_and(|v| !is_prerelease(&v)))
        .map(|tag| tag.name.as_str())
}

/// Treat a missing repository as an empty listing
fn empty_if_not_found<T>(result: Result<Vec<T>, SourceError>) -> Result<Vec<T>, SourceError> {
    match result {
        Err(e) if e.is_not_found() => {
            debug!(error = %e, "treating missing repository as empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Resolves the version a reference should move to
pub struct VersionResolver {
    source: Arc<dyn ReleaseSource>,
}

impl VersionResolver {
    /// Create a new resolver backed by the given source
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self { source }
    }

    /// Latest release of the referenced repository
    async fn latest_release(&self, reference: &Reference) -> Result<String, ResolveError> {
        let releases = empty_if_not_found(
            self.source
                .list_releases(&reference.owner, &reference.repo, &reference.auth_token)
                .await,
        )?;

        select_release(&releases)
            .map(str::to_string)
            .ok_or_else(|| ResolveError::no_releases(&reference.owner, &reference.repo))
    }

    /// Latest stable tag of the referenced repository
    async fn latest_tag(&self, reference: &Reference) -> Result<String, ResolveError> {
        let tags = empty_if_not_found(
            self.source
                .list_tags(&reference.owner, &reference.repo, &reference.auth_token)
                .await,
        )?;

        select_tag(&tags)
            .map(str::to_string)
            .ok_or_else(|| ResolveError::no_tags(&reference.owner, &reference.repo))
    }

    /// Resolve the next version for a reference
    ///
    /// The release wins over the tag unless `prefer_tags` is set and both
    /// are available. Only transport failures and a missing token are fatal.
    pub async fn resolve(
        &self,
        reference: &Reference,
        prefer_tags: bool,
    ) -> Result<ResolvedVersion, ResolveError> {
        if !reference.has_token() {
            return Err(ResolveError::MissingToken);
        }

        debug!(reference = %reference, source = self.source.source_name(), "resolving");

        let release = match self.latest_release(reference).await {
            Ok(release) => Some(release),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!(error = %e, "no release candidate");
                None
            }
        };

        let tag = match self.latest_tag(reference).await {
            Ok(tag) => Some(tag),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!(error = %e, "no tag candidate");
                None
            }
        };

        if let (Some(release), Some(tag)) = (&release, &tag) {
            if release != tag {
                warn!(
                    repository = %reference.slug(),
                    %release,
                    %tag,
                    "latest release and latest tag differ"
                );
            }
        }

        let resolved = match (release, tag) {
            (Some(_), Some(tag)) if prefer_tags => ResolvedVersion::tag(tag),
            (Some(release), _) => ResolvedVersion::release(release),
            (None, Some(tag)) => ResolvedVersion::tag(tag),
            (None, None) => {
                return Err(ResolveError::cannot_resolve(
                    &reference.owner,
                    &reference.repo,
                ))
            }
        };

        debug!(reference = %reference, resolved = %resolved, "resolved");
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionOrigin;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source with canned answers
    #[derive(Default)]
    struct MockSource {
        releases: Vec<Release>,
        tags: Vec<Tag>,
        not_found: bool,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(releases: &[&str], tags: &[&str]) -> Self {
            Self {
                releases: releases.iter().map(|r| Release::new(*r)).collect(),
                tags: tags.iter().map(|t| Tag::new(*t)).collect(),
                ..Default::default()
            }
        }

        fn check(&self, owner: &str, repo: &str) -> Result<(), SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let target = format!("{}/{}", owner, repo);
            if self.fail {
                return Err(SourceError::network_error(&target, "Mock", "connection refused"));
            }
            if self.not_found {
                return Err(SourceError::not_found(&target, "Mock"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ReleaseSource for MockSource {
        fn source_name(&self) -> &'static str {
            "Mock"
        }

        async fn list_releases(
            &self,
            owner: &str,
            repo: &str,
            _token: &str,
        ) -> Result<Vec<Release>, SourceError> {
            self.check(owner, repo)?;
            Ok(self.releases.clone())
        }

        async fn list_tags(
            &self,
            owner: &str,
            repo: &str,
            _token: &str,
        ) -> Result<Vec<Tag>, SourceError> {
            self.check(owner, repo)?;
            Ok(self.tags.clone())
        }
    }

    fn reference() -> Reference {
        Reference::new("https://github.com", "owner", "repo", "v1.0.0", "owner/repo@v1.0.0")
            .with_token("token")
    }

    fn resolver(source: MockSource) -> (VersionResolver, Arc<MockSource>) {
        let source = Arc::new(source);
        (VersionResolver::new(source.clone()), source)
    }

    #[test]
    fn test_select_release_max() {
        let releases = vec![
            Release::new("v0.4.0"),
            Release::new("v0.5.0"),
            Release::new("nightly"),
            Release::new("v0.3.2"),
        ];
        assert_eq!(select_release(&releases), Some("v0.5.0"));
    }

    #[test]
    fn test_select_release_first_wins_ties() {
        let releases = vec![Release::new("v1.0.0"), Release::new("1.0.0")];
        assert_eq!(select_release(&releases), Some("v1.0.0"));
    }

    #[test]
    fn test_select_release_none() {
        assert_eq!(select_release(&[]), None);
        assert_eq!(select_release(&[Release::new("latest")]), None);
    }

    #[test]
    fn test_select_tag_skips_prerelease() {
        let tags = vec![
            Tag::new("v2.0.0-rc.1"),
            Tag::new("snapshot"),
            Tag::new("v1.9.0"),
            Tag::new("v2.1.0"),
        ];
        assert_eq!(select_tag(&tags), Some("v1.9.0"));
    }

    #[test]
    fn test_select_tag_none() {
        assert_eq!(select_tag(&[Tag::new("v1.0.0-beta")]), None);
    }

    #[tokio::test]
    async fn test_resolve_prefers_release() {
        let (resolver, _) = resolver(MockSource::new(&["v0.5.0", "v0.4.0"], &["v0.6.0"]));
        let resolved = resolver.resolve(&reference(), false).await.unwrap();
        assert_eq!(resolved.version, "v0.5.0");
        assert_eq!(resolved.origin, VersionOrigin::Release);
    }

    #[tokio::test]
    async fn test_resolve_prefer_tags() {
        let (resolver, _) = resolver(MockSource::new(&["v0.5.0"], &["v0.6.0"]));
        let resolved = resolver.resolve(&reference(), true).await.unwrap();
        assert_eq!(resolved.version, "v0.6.0");
        assert_eq!(resolved.origin, VersionOrigin::Tag);
    }

    #[tokio::test]
    async fn test_resolve_prefer_tags_without_tags() {
        let (resolver, _) = resolver(MockSource::new(&["v0.5.0"], &[]));
        let resolved = resolver.resolve(&reference(), true).await.unwrap();
        assert_eq!(resolved, ResolvedVersion::release("v0.5.0"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_tag() {
        let (resolver, _) = resolver(MockSource::new(&[], &["v1.2.0", "v1.1.0"]));
        let resolved = resolver.resolve(&reference(), false).await.unwrap();
        assert_eq!(resolved, ResolvedVersion::tag("v1.2.0"));
    }

    #[tokio::test]
    async fn test_resolve_nothing_available() {
        let (resolver, _) = resolver(MockSource::new(&[], &[]));
        let err = resolver.resolve(&reference(), false).await.unwrap_err();
        assert!(matches!(err, ResolveError::CannotResolve { .. }));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_resolve_not_found_is_recoverable() {
        let (resolver, _) = resolver(MockSource {
            not_found: true,
            ..Default::default()
        });
        let err = resolver.resolve(&reference(), false).await.unwrap_err();
        assert!(matches!(err, ResolveError::CannotResolve { .. }));
    }

    #[tokio::test]
    async fn test_resolve_transport_error_is_fatal() {
        let (resolver, source) = resolver(MockSource {
            fail: true,
            ..Default::default()
        });
        let err = resolver.resolve(&reference(), false).await.unwrap_err();
        assert!(matches!(err, ResolveError::Source(_)));
        assert!(err.is_fatal());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_missing_token() {
        let (resolver, source) = resolver(MockSource::new(&["v1.0.0"], &[]));
        let reference =
            Reference::new("https://github.com", "owner", "repo", "v1.0.0", "owner/repo@v1.0.0");

        let err = resolver.resolve(&reference, false).await.unwrap_err();
        assert!(matches!(err, ResolveError::MissingToken));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
