//! Manifest file reading and writing

use crate::error::ManifestError;
use std::fs;
use std::path::Path;

/// Read a manifest file into a string
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
