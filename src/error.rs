//! Application error types using thiserror
//!
//! Error hierarchy:
//! - SourceError: Issues talking to GitHub or Ansible Galaxy
//! - ResolveError: Failure to pick a next version for a reference
//! - ManifestError: Issues reading, parsing or writing input files
//! - DockerError: Failures running `docker build`
//! - ConfigError: Issues with CLI configuration and credentials

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream source related errors
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Version resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Docker related errors
    #[error(transparent)]
    Docker(#[from] DockerError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to upstream source communication
#[derive(Error, Debug)]
pub enum SourceError {
    /// Repository or role not found upstream
    #[error("'{target}' not found on {source_name}")]
    NotFound { target: String, source_name: String },

    /// Network request failed
    #[error("failed to fetch '{target}' from {source_name}: {message}")]
    NetworkError {
        target: String,
        source_name: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {source_name}")]
    RateLimitExceeded { source_name: String },

    /// Invalid response from upstream
    #[error("invalid response from {source_name} for '{target}': {message}")]
    InvalidResponse {
        target: String,
        source_name: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{target}' from {source_name}")]
    Timeout { target: String, source_name: String },

    /// Authentication error
    #[error("authentication failed for {source_name}: {message}")]
    Unauthorized {
        source_name: String,
        message: String,
    },
}

/// Errors raised while resolving the next version of a reference
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No usable releases
    #[error("no releases available for {owner}/{repo}")]
    NoReleases { owner: String, repo: String },

    /// No usable tags
    #[error("no tags available for {owner}/{repo}")]
    NoTags { owner: String, repo: String },

    /// Neither releases nor tags produced a version
    #[error("cannot resolve a version for {owner}/{repo}")]
    CannotResolve { owner: String, repo: String },

    /// Resolution attempted without a credential
    #[error("missing GitHub token: set --token, GITHUB_READONLY_TOKEN or GITHUB_TOKEN")]
    MissingToken,

    /// Upstream transport failure
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing or encoding error
    #[error("failed to process YAML: {message}")]
    YamlError { message: String },

    /// Pre-commit config without any repos
    #[error("pre-commit config has no repos")]
    EmptyReposConfig,

    /// Requirements file layout not recognised
    #[error("unsupported requirements layout: {message}")]
    UnsupportedLayout { message: String },
}

/// Errors related to docker builds
#[derive(Error, Debug)]
pub enum DockerError {
    /// Dockerfile does not exist
    #[error("Dockerfile not found: {path}")]
    DockerfileNotFound { path: PathBuf },

    /// Build command could not be started
    #[error("failed to run '{command}': {source}")]
    SpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Build command exited with failure
    #[error("'{command}' failed: {stderr}")]
    BuildFailed { command: String, stderr: String },

    /// Not enough arguments to form a build command
    #[error("expected a build command such as 'docker build -t name .'")]
    InvalidCommand,
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Input file missing
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// No input given
    #[error("no input files provided")]
    NoInput,

    /// Hub config unreadable
    #[error("invalid hub config {path}: {message}")]
    InvalidHubConfig { path: PathBuf, message: String },
}

impl SourceError {
    /// Creates a new NotFound error
    pub fn not_found(target: impl Into<String>, source_name: impl Into<String>) -> Self {
        SourceError::NotFound {
            target: target.into(),
            source_name: source_name.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        target: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SourceError::NetworkError {
            target: target.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        target: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SourceError::InvalidResponse {
            target: target.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(source_name: impl Into<String>) -> Self {
        SourceError::RateLimitExceeded {
            source_name: source_name.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(target: impl Into<String>, source_name: impl Into<String>) -> Self {
        SourceError::Timeout {
            target: target.into(),
            source_name: source_name.into(),
        }
    }

    /// Returns true for a 404-style miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }
}

impl ResolveError {
    /// Creates a new NoReleases error
    pub fn no_releases(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        ResolveError::NoReleases {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Creates a new NoTags error
    pub fn no_tags(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        ResolveError::NoTags {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Creates a new CannotResolve error
    pub fn cannot_resolve(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        ResolveError::CannotResolve {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Returns true if the whole run must stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResolveError::MissingToken | ResolveError::Source(_))
    }
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new YamlError
    pub fn yaml_error(message: impl Into<String>) -> Self {
        ManifestError::YamlError {
            message: message.into(),
        }
    }
}

impl From<serde_yaml::Error> for ManifestError {
    fn from(e: serde_yaml::Error) -> Self {
        ManifestError::yaml_error(e.to_string())
    }
}

impl ConfigError {
    /// Creates a new FileNotFound error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        ConfigError::FileNotFound { path: path.into() }
    }
}
