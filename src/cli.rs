//! CLI argument parsing module for zoi

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable holding the GitHub token
pub const TOKEN_ENV: &str = "GITHUB_READONLY_TOKEN";

/// Keep pinned versions in text files up to date
#[derive(Parser, Debug, Clone)]
#[command(
    name = "zoi",
    version,
    about = "Bump pinned GitHub references in text files to their latest version"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Files to rewrite
    pub files: Vec<PathBuf>,

    /// Write the results back to the files
    #[arg(short, long)]
    pub inplace: bool,

    /// Show changes in diff format
    #[arg(long, conflicts_with = "json")]
    pub diff: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Choose the latest tag over the latest release
    #[arg(long, global = true)]
    pub prefer_tags: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// GitHub token
    #[arg(long, env = TOKEN_ENV, global = true, hide_env_values = true)]
    pub token: Option<String>,
}

/// Subcommands for structured inputs
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Update an Ansible requirements file
    Update {
        /// Requirements file to read
        #[arg(short, long, default_value = "requirements.yml")]
        requirements: PathBuf,

        /// File to write the updated requirements to
        #[arg(short, long, default_value = "latest.yml")]
        output: PathBuf,
    },

    /// Update the revs of a pre-commit config
    Precommit {
        /// pre-commit config file
        #[arg(short, long, default_value = ".pre-commit-config.yaml")]
        file: PathBuf,

        /// Write the result back instead of printing it
        #[arg(short, long)]
        inplace: bool,
    },

    /// Pin apk packages in a Dockerfile by building it
    Docker {
        /// Dockerfile to build
        #[arg(short, long, default_value = "Dockerfile")]
        file: PathBuf,
    },

    /// Run a docker build command and print pins for its apk packages
    Apk {
        /// Build command, e.g. `docker build -t name .`
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

impl CliArgs {
    /// Default log filter for this invocation
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "warn,zoi=debug"
        } else {
            "warn"
        }
    }
}
