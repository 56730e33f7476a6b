//! Error types for rust-msipackage

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while building an installer
#[derive(Error, Debug)]
pub enum MsiPackageError {
    #[error("Failed to create working directory")]
    WorkDirError {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read source directory: {path}")]
    SourceReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open source archive: {path}")]
    ArchiveOpenError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract source archive: {path}")]
    ArchiveExtractError {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to read icon file: {path}")]
    IconReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid icon file {path}: {message}")]
    IconFormatError { path: PathBuf, message: String },

    #[error("Failed to write {path}")]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Required tool not found on PATH: {tool}")]
    ToolNotFound { tool: &'static str },

    #[error("Failed to run {tool}")]
    ToolSpawnError {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed with {status}")]
    ToolFailed {
        tool: &'static str,
        status: ExitStatus,
    },
}
