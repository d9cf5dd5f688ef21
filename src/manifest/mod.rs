//! Structured input files
//!
//! This module provides:
//! - Ansible requirements loading, updating and rendering
//! - pre-commit config `rev` updates
//! - File read/write helpers shared by the commands

mod precommit;
mod requirements;
mod writer;

pub use precommit::update_precommit;
pub use requirements::{parse_requirements, render_requirements, Requirement, RequirementsUpdater};
pub use writer::{read_manifest, write_manifest};
