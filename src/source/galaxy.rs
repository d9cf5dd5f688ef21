//! Ansible Galaxy role lookup
//!
//! Maps a `user.role` shorthand to the GitHub repository it is built from.
//! API endpoint: https://galaxy.ansible.com/api/v1/roles/?owner__username={user}&name={role}
//!
//! Galaxy sits behind Cloudflare and answers bursts with HTTP 520, so the
//! client is configured with extra retries.

use crate::domain::GITHUB_HTTPS_ROOT;
use crate::error::SourceError;
use crate::source::HttpClient;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

/// Ansible Galaxy base URL
const GALAXY_URL: &str = "https://galaxy.ansible.com";

/// Retries for Galaxy requests
const GALAXY_MAX_RETRIES: u32 = 5;

/// Source name used in errors
const SOURCE_NAME: &str = "Ansible Galaxy";

/// A role resolved to its GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalaxyRole {
    /// Full repository URL, e.g. `https://github.com/user/repo`
    pub url: String,
    /// GitHub user owning the repository
    pub user: String,
    /// GitHub repository name
    pub repo: String,
}

/// Trait for role lookups
#[async_trait]
pub trait RoleLookup: Send + Sync {
    /// Find the repository behind `user.role`
    ///
    /// Returns `None` when zero or several roles match.
    async fn find_role_url(&self, user: &str, role: &str)
        -> Result<Option<GalaxyRole>, SourceError>;
}

/// Galaxy roles search response
#[derive(Debug, Deserialize)]
struct RolesResponse {
    count: usize,
    #[serde(default)]
    results: Vec<RoleResult>,
}

/// Single role entry
#[derive(Debug, Deserialize)]
struct RoleResult {
    github_user: String,
    github_repo: String,
    #[serde(default)]
    github_server: String,
}

/// Ansible Galaxy API client
pub struct GalaxyClient {
    client: HttpClient,
    base_url: String,
}

impl GalaxyClient {
    /// Create a new Galaxy client against the public API
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, GALAXY_URL)
    }

    /// Create a Galaxy client against a custom API root
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client: client.with_max_retries(GALAXY_MAX_RETRIES),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the search URL for a role
    fn build_url(&self, user: &str, role: &str) -> Result<Url, SourceError> {
        Url::parse_with_params(
            &format!("{}/api/v1/roles/", self.base_url),
            &[("owner__username", user), ("name", role)],
        )
        .map_err(|e| {
            SourceError::network_error(format!("{}.{}", user, role), SOURCE_NAME, e.to_string())
        })
    }
}

#[async_trait]
impl RoleLookup for GalaxyClient {
    async fn find_role_url(
        &self,
        user: &str,
        role: &str,
    ) -> Result<Option<GalaxyRole>, SourceError> {
        let url = self.build_url(user, role)?;
        let target = format!("{}.{}", user, role);
        debug!(user, role, %url, "querying ansible galaxy");

        let response: RolesResponse = self
            .client
            .get_json(url.as_str(), &target, SOURCE_NAME, "")
            .await?;

        if response.count != 1 {
            warn!(
                user,
                role,
                count = response.count,
                "incorrect amount of ansible galaxy roles found"
            );
            return Ok(None);
        }

        let Some(found) = response.results.into_iter().next() else {
            return Ok(None);
        };

        let server = if found.github_server.is_empty() {
            GITHUB_HTTPS_ROOT
        } else {
            found.github_server.trim_end_matches('/')
        };

        let resolved = GalaxyRole {
            url: format!("{}/{}/{}", server, found.github_user, found.github_repo),
            user: found.github_user,
            repo: found.github_repo,
        };
        debug!(url = %resolved.url, "found role");

        Ok(Some(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn galaxy(server: &Server) -> GalaxyClient {
        GalaxyClient::with_base_url(HttpClient::new().unwrap(), &server.url())
    }

    fn role_query(user: &str, role: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("owner__username".into(), user.into()),
            Matcher::UrlEncoded("name".into(), role.into()),
        ])
    }

    #[test]
    fn test_build_url() {
        let client = GalaxyClient::new(HttpClient::new().unwrap());
        assert_eq!(
            client.build_url("snakeego", "docker").unwrap().as_str(),
            "https://galaxy.ansible.com/api/v1/roles/?owner__username=snakeego&name=docker"
        );
    }

    #[test]
    fn test_build_url_encodes_query() {
        let client = GalaxyClient::new(HttpClient::new().unwrap());
        assert_eq!(
            client.build_url("a b", "x&y").unwrap().as_str(),
            "https://galaxy.ansible.com/api/v1/roles/?owner__username=a+b&name=x%26y"
        );
    }

    #[test]
    fn test_build_url_invalid_base() {
        let client = GalaxyClient::with_base_url(HttpClient::new().unwrap(), "not a url");
        assert!(matches!(
            client.build_url("u", "r"),
            Err(SourceError::NetworkError { .. })
        ));
    }

    #[test]
    fn test_galaxy_retries() {
        let client = GalaxyClient::new(HttpClient::new().unwrap());
        assert_eq!(client.client.max_retries(), GALAXY_MAX_RETRIES);
    }

    #[tokio::test]
    async fn test_find_role_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/roles/")
            .match_query(role_query("snakeego", "docker"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "count": 1,
                    "next": null,
                    "results": [{
                        "id": 1,
                        "name": "docker",
                        "github_user": "snakeego",
                        "github_repo": "ansible-role-docker",
                        "github_server": "https://github.com",
                        "github_branch": "master"
                    }]
                }"#,
            )
            .create_async()
            .await;

        let role = galaxy(&server)
            .find_role_url("snakeego", "docker")
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(role.url, "https://github.com/snakeego/ansible-role-docker");
        assert_eq!(role.user, "snakeego");
        assert_eq!(role.repo, "ansible-role-docker");
    }

    #[tokio::test]
    async fn test_find_role_url_default_server() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/roles/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"count": 1, "results": [{"github_user": "u", "github_repo": "r", "github_server": ""}]}"#,
            )
            .create_async()
            .await;

        let role = galaxy(&server).find_role_url("u", "r").await.unwrap().unwrap();
        assert_eq!(role.url, "https://github.com/u/r");
    }

    #[tokio::test]
    async fn test_find_role_url_no_match() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/roles/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"count": 0, "results": []}"#)
            .create_async()
            .await;

        let role = galaxy(&server).find_role_url("nobody", "nothing").await.unwrap();
        assert!(role.is_none());
    }

    #[tokio::test]
    async fn test_find_role_url_ambiguous() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/roles/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"count": 2, "results": [
                    {"github_user": "a", "github_repo": "r"},
                    {"github_user": "b", "github_repo": "r"}
                ]}"#,
            )
            .create_async()
            .await;

        let role = galaxy(&server).find_role_url("x", "r").await.unwrap();
        assert!(role.is_none());
    }
}
