//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Optional bearer-token authentication per request
//! - Exponential backoff retry logic on rate limits and 5xx responses
//! - `Link: rel="next"` pagination support

use crate::error::SourceError;
use reqwest::header::{ACCEPT, LINK};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("zoi/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// Media type requested from upstream APIs
const ACCEPT_JSON: &str = "application/vnd.github+json, application/json";

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                SourceError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Get the maximum number of retries
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Perform a GET request with retry logic and error context
    ///
    /// An empty `token` sends the request unauthenticated.
    pub async fn get_with_context(
        &self,
        url: &str,
        target: &str,
        source_name: &str,
        token: &str,
    ) -> Result<reqwest::Response, SourceError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            let mut request = self.client.get(url).header(ACCEPT, ACCEPT_JSON);
            if !token.is_empty() {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if is_rate_limited(&response) {
                        last_error = Some(SourceError::rate_limit_exceeded(source_name));
                    } else if status.is_server_error() {
                        last_error = Some(SourceError::network_error(
                            target,
                            source_name,
                            format!("HTTP {}", status),
                        ));
                    } else if status == StatusCode::NOT_FOUND {
                        return Err(SourceError::not_found(target, source_name));
                    } else if status == StatusCode::UNAUTHORIZED {
                        return Err(SourceError::Unauthorized {
                            source_name: source_name.to_string(),
                            message: format!("HTTP {}", status),
                        });
                    } else if !status.is_success() {
                        return Err(SourceError::network_error(
                            target,
                            source_name,
                            format!("HTTP {}", status),
                        ));
                    } else {
                        return Ok(response);
                    }

                    debug!(url, attempt, %status, "retrying request");
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(SourceError::timeout(target, source_name));
                    } else {
                        last_error = Some(SourceError::network_error(
                            target,
                            source_name,
                            e.to_string(),
                        ));
                    }
                }
            }

            if attempt < self.max_retries {
                // Wait before retrying with exponential backoff
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }
        }

        Err(last_error
            .unwrap_or_else(|| SourceError::network_error(target, source_name, "unknown error")))
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        target: &str,
        source_name: &str,
        token: &str,
    ) -> Result<T, SourceError> {
        let (parsed, _) = self.get_json_page(url, target, source_name, token).await?;
        Ok(parsed)
    }

    /// Perform a GET request, parse the JSON body and return the next page URL
    pub async fn get_json_page<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        target: &str,
        source_name: &str,
        token: &str,
    ) -> Result<(T, Option<String>), SourceError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            // Network errors are already retried in get_with_context
            let response = self
                .get_with_context(url, target, source_name, token)
                .await?;

            let next = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_page_url);

            match response.json::<T>().await {
                Ok(parsed) => return Ok((parsed, next)),
                Err(e) => {
                    last_error = Some(SourceError::invalid_response(
                        target,
                        source_name,
                        format!("failed to parse JSON: {}", e),
                    ));

                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SourceError::invalid_response(target, source_name, "unknown JSON parse error")
        }))
    }
}

/// GitHub signals exhausted quotas with 403 and a zero remaining count
fn is_rate_limited(response: &reqwest::Response) -> bool {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    response.status() == StatusCode::FORBIDDEN
        && response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0")
}

/// Extract the `rel="next"` target from a `Link` header
pub fn next_page_url(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim().replace(' ', "") == "rel=\"next\"");
        if !is_next {
            return None;
        }
        let target = target.trim();
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new().expect("failed to create default HTTP client")
    }
}
