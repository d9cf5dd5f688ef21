//! zoi - keeps pinned GitHub references in text files up to date
//!
//! Besides plain text files it handles:
//! - Ansible requirements files
//! - pre-commit configs
//! - Alpine packages installed by Dockerfiles

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zoi::cli::{CliArgs, Command};
use zoi::config::discover_token;
use zoi::docker::{apk_report, pin_dockerfile_file, SystemBuildRunner};
use zoi::error::ConfigError;
use zoi::manifest::{read_manifest, update_precommit, write_manifest, RequirementsUpdater};
use zoi::orchestrator::{Orchestrator, RunOptions};
use zoi::output::{create_formatter, OutputConfig};
use zoi::resolve::VersionResolver;
use zoi::rewrite::LineRewriter;
use zoi::source::{GalaxyClient, GitHubSource, HttpClient};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.log_level());

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from the flags
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let color = io::stdout().is_terminal();
    colored::control::set_override(color);

    match args.command.clone() {
        None => rewrite_files(&args, color).await,
        Some(Command::Update {
            requirements,
            output,
        }) => update_requirements(&args, &requirements, &output).await,
        Some(Command::Precommit { file, inplace }) => precommit(&args, &file, inplace).await,
        Some(Command::Docker { file }) => {
            let pinned = pin_dockerfile_file(&file, &SystemBuildRunner::new())?;
            print_out(&pinned)
        }
        Some(Command::Apk { command }) => {
            let report = apk_report(&command, &SystemBuildRunner::new())?;
            if report.is_empty() {
                return Ok(());
            }
            print_out(&format!("{}\n", report))
        }
    }
}

/// Rewrite references in plain files
async fn rewrite_files(args: &CliArgs, color: bool) -> anyhow::Result<()> {
    let options = RunOptions {
        token: discover_token(args.token.as_deref())?,
        prefer_tags: args.prefer_tags,
        inplace: args.inplace,
        show_progress: !args.verbose && io::stderr().is_terminal(),
    };

    let orchestrator = Orchestrator::new(options)?;
    let results = orchestrator.run(&args.files).await?;

    let formatter = create_formatter(OutputConfig::from_cli(args.json, args.diff).with_color(color));
    let mut stdout = io::stdout().lock();
    formatter.format(&results, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Update an Ansible requirements file into a new file
async fn update_requirements(args: &CliArgs, requirements: &Path, output: &Path) -> anyhow::Result<()> {
    require_file(requirements)?;
    let token = discover_token(args.token.as_deref())?;

    let client = HttpClient::new()?;
    let updater = RequirementsUpdater::new(
        Arc::new(GalaxyClient::new(client.clone())),
        VersionResolver::new(Arc::new(GitHubSource::new(client))),
    );

    let content = read_manifest(requirements)?;
    let rendered = updater
        .update_document(&content, &token, args.prefer_tags)
        .await?;
    write_manifest(output, &rendered)?;

    info!(output = %output.display(), "requirements written");
    Ok(())
}

/// Update the revs of a pre-commit config
async fn precommit(args: &CliArgs, file: &Path, inplace: bool) -> anyhow::Result<()> {
    require_file(file)?;
    let token = discover_token(args.token.as_deref())?;

    let source = GitHubSource::new(HttpClient::new()?);
    let rewriter = LineRewriter::new(VersionResolver::new(Arc::new(source)));

    let content = read_manifest(file)?;
    let updated = update_precommit(&content, &rewriter, &token, args.prefer_tags).await?;

    if inplace {
        write_manifest(file, &updated)?;
        info!(path = %file.display(), "pre-commit config updated");
        return Ok(());
    }
    print_out(&updated)
}

/// Reject a missing input file
fn require_file(path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::file_not_found(path))
    }
}

/// Write text to stdout as-is
fn print_out(text: &str) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
