//! Source acquisition: directory pass-through or archive extraction.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::MsiPackageError;

/// Normalize the input into a plain directory for the walker.
///
/// A directory path is used as-is. Anything else is treated as a zip archive
/// and fully extracted into `scratch` before walking.
pub fn acquire_source(input: &Path, scratch: &Path) -> Result<PathBuf> {
    if input.is_dir() {
        return Ok(input.to_path_buf());
    }

    let file = File::open(input).map_err(|e| MsiPackageError::ArchiveOpenError {
        path: input.to_path_buf(),
        source: e,
    })?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| MsiPackageError::ArchiveExtractError {
            path: input.to_path_buf(),
            source: e,
        })?;

    let destination = scratch.join("src");
    archive
        .extract(&destination)
        .map_err(|e| MsiPackageError::ArchiveExtractError {
            path: input.to_path_buf(),
            source: e,
        })?;

    Ok(destination)
}
