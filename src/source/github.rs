//! GitHub REST API source
//!
//! Lists releases and tags for a repository.
//! API endpoints:
//! - https://api.github.com/repos/{owner}/{repo}/releases
//! - https://api.github.com/repos/{owner}/{repo}/tags
//!
//! Both are paginated; pages are followed through the `Link` header.

use crate::error::SourceError;
use crate::source::{HttpClient, Release, ReleaseSource, Tag};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

/// GitHub API base URL
const GITHUB_API_URL: &str = "https://api.github.com";

/// Items requested per page (GitHub maximum)
const PER_PAGE: u32 = 100;

/// Source name used in errors
const SOURCE_NAME: &str = "GitHub";

/// GitHub releases and tags source
pub struct GitHubSource {
    client: HttpClient,
    base_url: String,
}

impl GitHubSource {
    /// Create a new GitHub source against the public API
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, GITHUB_API_URL)
    }

    /// Create a GitHub source against a custom API root
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the first-page URL for a repository collection
    fn build_url(&self, owner: &str, repo: &str, collection: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}?per_page={}",
            self.base_url, owner, repo, collection, PER_PAGE
        )
    }

    /// Fetch every page of a collection
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        first_url: String,
        target: &str,
        token: &str,
    ) -> Result<Vec<T>, SourceError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            debug!(%url, "fetching page");
            let (page, next_url): (Vec<T>, _) = self
                .client
                .get_json_page(&url, target, SOURCE_NAME, token)
                .await?;
            items.extend(page);
            next = next_url;
        }

        Ok(items)
    }
}

#[async_trait]
impl ReleaseSource for GitHubSource {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        token: &str,
    ) -> Result<Vec<Release>, SourceError> {
        let target = format!("{}/{}", owner, repo);
        let url = self.build_url(owner, repo, "releases");
        self.fetch_all(url, &target, token).await
    }

    async fn list_tags(
        &self,
        owner: &str,
        repo: &str,
        token: &str,
    ) -> Result<Vec<Tag>, SourceError> {
        let target = format!("{}/{}", owner, repo);
        let url = self.build_url(owner, repo, "tags");
        self.fetch_all(url, &target, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn source(server: &Server) -> GitHubSource {
        let client = HttpClient::new().unwrap().with_max_retries(0);
        GitHubSource::with_base_url(client, &server.url())
    }

    #[test]
    fn test_source_name() {
        let source = GitHubSource::new(HttpClient::new().unwrap());
        assert_eq!(source.source_name(), "GitHub");
    }

    #[test]
    fn test_build_url() {
        let source = GitHubSource::new(HttpClient::new().unwrap());
        assert_eq!(
            source.build_url("mhristof", "semver", "releases"),
            "https://api.github.com/repos/mhristof/semver/releases?per_page=100"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let source = GitHubSource::with_base_url(HttpClient::new().unwrap(), "http://localhost/");
        assert_eq!(
            source.build_url("o", "r", "tags"),
            "http://localhost/repos/o/r/tags?per_page=100"
        );
    }

    #[tokio::test]
    async fn test_list_releases() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/mhristof/semver/releases")
            .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
            .match_header("authorization", "Bearer token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "v0.5.0", "name": "v0.5.0", "draft": false},
                    {"tag_name": "v0.4.0", "name": "v0.4.0", "draft": false}
                ]"#,
            )
            .create_async()
            .await;

        let releases = source(&server)
            .list_releases("mhristof", "semver", "token")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(releases, vec![Release::new("v0.5.0"), Release::new("v0.4.0")]);
    }

    #[tokio::test]
    async fn test_list_tags_follows_pagination() {
        let mut server = Server::new_async().await;
        let second = format!("{}/repositories/42/tags?per_page=100&page=2", server.url());

        let first_mock = server
            .mock("GET", "/repos/o/r/tags")
            .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
            .with_status(200)
            .with_header("link", &format!("<{}>; rel=\"next\"", second))
            .with_body(r#"[{"name": "v2.0.0"}, {"name": "v1.9.0"}]"#)
            .create_async()
            .await;
        let second_mock = server
            .mock("GET", "/repositories/42/tags")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(r#"[{"name": "v1.0.0"}]"#)
            .create_async()
            .await;

        let tags = source(&server).list_tags("o", "r", "").await.unwrap();

        first_mock.assert_async().await;
        second_mock.assert_async().await;
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["v2.0.0", "v1.9.0", "v1.0.0"]);
    }

    #[tokio::test]
    async fn test_list_releases_empty() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/o/r/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let releases = source(&server).list_releases("o", "r", "").await.unwrap();
        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn test_list_releases_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/nonexistent/repo/releases")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let result = source(&server)
            .list_releases("nonexistent", "repo", "")
            .await;

        assert!(matches!(result, Err(SourceError::NotFound { .. })));
    }
}
