//! Resolution result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionOrigin {
    /// A published GitHub release
    Release,
    /// A lightweight git tag
    Tag,
}

impl fmt::Display for VersionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionOrigin::Release => write!(f, "release"),
            VersionOrigin::Tag => write!(f, "tag"),
        }
    }
}

/// The version chosen to replace a pinned version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVersion {
    /// Version string as published upstream (prefix preserved)
    pub version: String,
    /// Source the version was taken from
    pub origin: VersionOrigin,
}

impl ResolvedVersion {
    /// Creates a release-derived version
    pub fn release(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            origin: VersionOrigin::Release,
        }
    }

    /// Creates a tag-derived version
    pub fn tag(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            origin: VersionOrigin::Tag,
        }
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.origin)
    }
}
