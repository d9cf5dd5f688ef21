//! Line-by-line reference rewriting

use crate::domain::LineChange;
use crate::error::ResolveError;
use crate::parser::{default_parsers, parse_with, points_at_latest, ReferenceParser};
use crate::resolve::VersionResolver;
use crate::rewrite::substitute;
use tracing::{debug, info};

/// Result of rewriting a whole text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRewrite {
    /// Rewritten text
    pub content: String,
    /// Lines that changed
    pub changes: Vec<LineChange>,
}

impl TextRewrite {
    /// Check if any line changed
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Applies parsing, resolution and substitution to lines of text
pub struct LineRewriter {
    parsers: Vec<Box<dyn ReferenceParser>>,
    resolver: VersionResolver,
}

impl LineRewriter {
    /// Create a rewriter with the default parsers
    pub fn new(resolver: VersionResolver) -> Self {
        Self::with_parsers(resolver, default_parsers())
    }

    /// Create a rewriter with a custom parser list
    pub fn with_parsers(resolver: VersionResolver, parsers: Vec<Box<dyn ReferenceParser>>) -> Self {
        Self { parsers, resolver }
    }

    /// Rewrite the reference found in a single line
    ///
    /// Lines without a pinned reference, and references that cannot be
    /// resolved, come back unchanged. Only fatal resolver errors are returned.
    pub async fn rewrite_line(
        &self,
        line: &str,
        token: &str,
        prefer_tags: bool,
    ) -> Result<String, ResolveError> {
        if points_at_latest(line) {
            debug!(line, "tracks releases/latest, leaving as is");
            return Ok(line.to_string());
        }

        let Some(reference) = parse_with(&self.parsers, line) else {
            return Ok(line.to_string());
        };
        let reference = reference.with_token(token);

        let resolved = match self.resolver.resolve(&reference, prefer_tags).await {
            Ok(resolved) => resolved,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!(reference = %reference, error = %e, "leaving reference unchanged");
                return Ok(line.to_string());
            }
        };

        let replacement = substitute(&reference, &resolved.version);
        if replacement != reference.matched_text {
            info!(
                repository = %reference.slug(),
                from = %reference.current_version,
                to = %resolved,
                "updating reference"
            );
        }

        Ok(line.replace(&reference.matched_text, &replacement))
    }

    /// Rewrite every line of a text, keeping line order and line endings
    pub async fn rewrite_text(
        &self,
        text: &str,
        token: &str,
        prefer_tags: bool,
    ) -> Result<TextRewrite, ResolveError> {
        let mut lines = Vec::new();
        let mut changes = Vec::new();

        for (index, line) in text.split('\n').enumerate() {
            let rewritten = self.rewrite_line(line, token, prefer_tags).await?;
            if rewritten != line {
                changes.push(LineChange::new(index + 1, line, rewritten.as_str()));
            }
            lines.push(rewritten);
        }

        Ok(TextRewrite {
            content: lines.join("\n"),
            changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::source::{Release, ReleaseSource, Tag};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Source keyed by `owner/repo`
    #[derive(Default)]
    struct MapSource {
        releases: HashMap<String, Vec<&'static str>>,
        tags: HashMap<String, Vec<&'static str>>,
        broken: bool,
    }

    impl MapSource {
        fn release(mut self, slug: &str, tags: &[&'static str]) -> Self {
            self.releases.insert(slug.to_string(), tags.to_vec());
            self
        }

        fn tag(mut self, slug: &str, tags: &[&'static str]) -> Self {
            self.tags.insert(slug.to_string(), tags.to_vec());
            self
        }
    }

    #[async_trait]
    impl ReleaseSource for MapSource {
        fn source_name(&self) -> &'static str {
            "Map"
        }

        async fn list_releases(
            &self,
            owner: &str,
            repo: &str,
            _token: &str,
        ) -> Result<Vec<Release>, SourceError> {
            let slug = format!("{}/{}", owner, repo);
            if self.broken {
                return Err(SourceError::timeout(slug, "Map"));
            }
            Ok(self
                .releases
                .get(&slug)
                .map(|v| v.iter().map(|t| Release::new(*t)).collect())
                .unwrap_or_default())
        }

        async fn list_tags(
            &self,
            owner: &str,
            repo: &str,
            _token: &str,
        ) -> Result<Vec<Tag>, SourceError> {
            let slug = format!("{}/{}", owner, repo);
            Ok(self
                .tags
                .get(&slug)
                .map(|v| v.iter().map(|t| Tag::new(*t)).collect())
                .unwrap_or_default())
        }
    }

    fn rewriter(source: MapSource) -> LineRewriter {
        LineRewriter::new(VersionResolver::new(Arc::new(source)))
    }

    #[tokio::test]
    async fn test_rewrite_release_download() {
        let rewriter = rewriter(MapSource::default().release("mhristof/semver", &["v0.5.0", "v0.4.0"]));
        let line = "curl -L https://github.com/mhristof/semver/releases/download/v0.3.2/semver.darwin -o semver";

        let out = rewriter.rewrite_line(line, "token", false).await.unwrap();
        assert_eq!(
            out,
            "curl -L https://github.com/mhristof/semver/releases/download/v0.5.0/semver.darwin -o semver"
        );
    }

    #[tokio::test]
    async fn test_rewrite_action_in_prose_keeps_full_stop() {
        let rewriter = rewriter(MapSource::default().release("actions/checkout", &["v2.3.1"]));

        let out = rewriter
            .rewrite_line("Pin it to actions/checkout@v2.", "token", false)
            .await
            .unwrap();
        assert_eq!(out, "Pin it to actions/checkout@v2.3.1.");
    }

    #[tokio::test]
    async fn test_rewrite_ssh_from_tag() {
        let rewriter = rewriter(MapSource::default().tag("mhristof/semver", &["v1.2.0", "v1.1.0"]));
        let line = r#"  source = "git::git@github.com:mhristof/semver.git?ref=v1.0.0""#;

        let out = rewriter.rewrite_line(line, "token", false).await.unwrap();
        assert_eq!(out, r#"  source = "git::git@github.com:mhristof/semver.git?ref=v1.2.0""#);
    }

    #[tokio::test]
    async fn test_rewrite_action() {
        let rewriter = rewriter(
            MapSource::default().release("mhristof/zoi-github-autopr", &["0.2.0", "0.1.1"]),
        );
        let out = rewriter
            .rewrite_line("uses: mhristof/zoi-github-autopr@0.1.1", "token", false)
            .await
            .unwrap();
        assert_eq!(out, "uses: mhristof/zoi-github-autopr@0.2.0");
    }

    #[tokio::test]
    async fn test_rewrite_latest_unchanged() {
        let rewriter = rewriter(MapSource {
            broken: true,
            ..Default::default()
        });
        let line = "curl https://github.com/mhristof/semver/releases/latest/download/semver.darwin";
        assert_eq!(rewriter.rewrite_line(line, "token", false).await.unwrap(), line);
    }

    #[tokio::test]
    async fn test_rewrite_unresolvable_unchanged() {
        let rewriter = rewriter(MapSource::default());
        let line = "uses: actions/checkout@v2";
        assert_eq!(rewriter.rewrite_line(line, "token", false).await.unwrap(), line);
    }

    #[tokio::test]
    async fn test_rewrite_plain_text_needs_no_token() {
        let rewriter = rewriter(MapSource {
            broken: true,
            ..Default::default()
        });
        assert_eq!(
            rewriter.rewrite_line("this is a test", "", false).await.unwrap(),
            "this is a test"
        );
    }

    #[tokio::test]
    async fn test_rewrite_missing_token() {
        let rewriter = rewriter(MapSource::default().release("actions/checkout", &["v2.3.1"]));
        let err = rewriter
            .rewrite_line("uses: actions/checkout@v2", "", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingToken));
    }

    #[tokio::test]
    async fn test_rewrite_transport_error() {
        let rewriter = rewriter(MapSource {
            broken: true,
            ..Default::default()
        });
        let err = rewriter
            .rewrite_line("uses: actions/checkout@v2", "token", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Source(SourceError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_rewrite_collision_guard() {
        let rewriter = rewriter(MapSource::default().release("actions/checkout", &["v2.3.1"]));
        let out = rewriter
            .rewrite_line("uses: actions/checkout@v2", "token", false)
            .await
            .unwrap();
        assert_eq!(out, "uses: actions/checkout@v2.3.1");
    }

    #[tokio::test]
    async fn test_rewrite_text() {
        let rewriter = rewriter(
            MapSource::default()
                .release("actions/checkout", &["v2.3.1"])
                .release("actions/setup-go", &["v2.1.3"]),
        );
        let text = "steps:\n  - uses: actions/checkout@v2.3.1\n  - uses: actions/setup-go@v2.1.0\n";

        let result = rewriter.rewrite_text(text, "token", false).await.unwrap();
        assert_eq!(
            result.content,
            "steps:\n  - uses: actions/checkout@v2.3.1\n  - uses: actions/setup-go@v2.1.3\n"
        );
        assert!(result.has_changes());
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].line_number, 3);
        assert_eq!(result.changes[0].after, "  - uses: actions/setup-go@v2.1.3");
    }

    #[tokio::test]
    async fn test_rewrite_text_without_trailing_newline() {
        let rewriter = rewriter(MapSource::default());
        let result = rewriter.rewrite_text("a\nb", "", false).await.unwrap();
        assert_eq!(result.content, "a\nb");
        assert!(!result.has_changes());
    }
}
