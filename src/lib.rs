//! zoi - keeps pinned GitHub references in text files up to date
//!
//! This library provides the building blocks of the `zoi` CLI:
//! - Parsers recognising pinned references inside arbitrary lines
//! - A resolver picking the latest release or tag from GitHub
//! - Collision-safe substitution and the line rewriter driving it
//! - Updaters for Ansible requirements, pre-commit configs and Dockerfiles

pub mod cli;
pub mod config;
pub mod docker;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod resolve;
pub mod rewrite;
pub mod source;
