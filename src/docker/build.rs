//! `docker build` invocation

use crate::error::DockerError;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Captured output of a finished build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    pub stdout: String,
    pub stderr: String,
}

impl BuildOutput {
    /// Create a build output from captured streams
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Both streams joined; BuildKit reports progress on stderr
    pub fn log(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Trait for running build commands
pub trait BuildRunner {
    /// Run `program` with `args`, failing on a non-zero exit
    fn run(&self, program: &str, args: &[String]) -> Result<BuildOutput, DockerError>;
}

/// Runner that executes real processes
#[derive(Debug, Default)]
pub struct SystemBuildRunner;

impl SystemBuildRunner {
    pub fn new() -> Self {
        Self
    }
}

impl BuildRunner for SystemBuildRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<BuildOutput, DockerError> {
        let command = display_command(program, args);
        debug!(%command, "running build");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| DockerError::SpawnError {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(DockerError::BuildFailed {
                command,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(BuildOutput::new(stdout, stderr))
    }
}

/// Render a command line for logs and errors
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Image tag derived from the Dockerfile content
pub fn image_tag(content: &[u8]) -> String {
    format!("zoi-{}", hex::encode(Sha256::digest(content)))
}

/// Arguments for an uncached build of `dockerfile`
pub fn dockerfile_build_args(dockerfile: &Path, tag: &str) -> Vec<String> {
    let context = match dockerfile.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    vec![
        "build".to_string(),
        "--no-cache".to_string(),
        "-t".to_string(),
        tag.to_string(),
        "-f".to_string(),
        dockerfile.display().to_string(),
        context.display().to_string(),
    ]
}

/// Split a user supplied build command, forcing `--no-cache` after the
/// subcommand (`docker build -t x .` runs as `docker build --no-cache -t x .`)
pub fn uncached_command(args: &[String]) -> Result<(String, Vec<String>), DockerError> {
    let [program, subcommand, rest @ ..] = args else {
        return Err(DockerError::InvalidCommand);
    };

    let mut command_args = vec![subcommand.clone(), "--no-cache".to_string()];
    command_args.extend(rest.iter().cloned());
    Ok((program.clone(), command_args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_image_tag() {
        assert_eq!(
            image_tag(b""),
            "zoi-e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_dockerfile_build_args() {
        let args = dockerfile_build_args(Path::new("images/base/Dockerfile"), "zoi-abc");
        assert_eq!(
            args,
            strings(&[
                "build",
                "--no-cache",
                "-t",
                "zoi-abc",
                "-f",
                "images/base/Dockerfile",
                "images/base"
            ])
        );
    }

    #[test]
    fn test_dockerfile_build_args_bare_name() {
        let args = dockerfile_build_args(Path::new("Dockerfile"), "zoi-abc");
        assert_eq!(args.last().map(String::as_str), Some("."));
    }

    #[test]
    fn test_uncached_command() {
        let (program, args) = uncached_command(&strings(&["docker", "build", "-t", "foo", "."])).unwrap();
        assert_eq!(program, "docker");
        assert_eq!(args, strings(&["build", "--no-cache", "-t", "foo", "."]));
    }

    #[test]
    fn test_uncached_command_too_short() {
        assert!(matches!(
            uncached_command(&strings(&["docker"])),
            Err(DockerError::InvalidCommand)
        ));
        assert!(matches!(uncached_command(&[]), Err(DockerError::InvalidCommand)));
    }

    #[test]
    fn test_display_command() {
        assert_eq!(
            display_command("docker", &strings(&["build", "."])),
            "docker build ."
        );
    }

    #[test]
    fn test_system_runner_missing_program() {
        let err = SystemBuildRunner::new()
            .run("zoi-definitely-not-a-program", &[])
            .unwrap_err();
        assert!(matches!(err, DockerError::SpawnError { .. }));
    }
}
