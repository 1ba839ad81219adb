//! Filesystem utilities

use std::path::Path;

use anyhow::bail;
use log::{debug, error};

/// Check if a path exists
pub fn path_exists(path: &str) -> bool {
    Path::new(path).exists()
}

/// Check if a path is a directory
pub fn is_directory(path: &str) -> bool {
    Path::new(path).is_dir()
}

/// Ensure `path` names an existing regular file
///
/// Used at startup for inputs the service only reads and never creates.
pub fn require_file(path: &str) -> anyhow::Result<()> {
    if !path_exists(path) {
        error!("Required file does not exist: {}", path);
        bail!("required file does not exist: {}", path);
    }
    if is_directory(path) {
        error!("Expected a file but found a directory: {}", path);
        bail!("expected a file but found a directory: {}", path);
    }
    debug!("Found required file: {}", path);
    Ok(())
}
