//! rust-msipackage: a small builder for simple Windows installers
//!
//! This library turns a directory (or zip archive) of files into a WiX
//! installer description and hands it to the external WiX toolchain to
//! produce the final `.msi`. Component and file identifiers are derived
//! deterministically from the upgrade code, so repeated builds of the same
//! tree keep their identities.

pub mod config;
pub mod diag;
pub mod error;
pub mod harvest;
pub mod icolib;
pub mod ident;
pub mod source;
pub mod toolchain;
pub mod wxs;

use std::path::PathBuf;

use anyhow::Result;
use uuid::Uuid;

use crate::config::BuildConfig;
use crate::diag::Diagnostics;

pub use error::MsiPackageError;

/// Options for building an installer, as supplied on the command line
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Source directory or zip archive
    pub source: PathBuf,
    /// Path for the output .msi file
    pub output_msi: PathBuf,
    /// Optional path for the intermediate .wxs document
    pub output_wxs: Option<PathBuf>,
    /// Product name
    pub name: String,
    /// Manufacturer (defaults to the product name)
    pub manufacturer: Option<String>,
    /// Product version (defaults with a warning)
    pub version: Option<String>,
    /// UpgradeCode GUID (generated with a warning when absent)
    pub upgrade_code: Option<Uuid>,
    /// Summary-information codepage
    pub codepage: u32,
    /// Installer language id
    pub language: u32,
    /// Build a 64-bit installer
    pub x64: bool,
    /// Install-relative path of the file to receive a Start Menu shortcut
    pub shortcut: Option<String>,
    /// Icon file to embed and reference
    pub icon: Option<PathBuf>,
    /// Culture tag enabling the install-directory UI
    pub with_ui: Option<String>,
    /// Raw NAME=VALUE WixVariable definitions
    pub variables: Vec<String>,
}

/// Outcome of a build: where the installer landed plus collected warnings.
#[derive(Debug)]
pub struct BuildReport {
    pub msi_path: PathBuf,
    pub diagnostics: Diagnostics,
}

/// Build an installer from the given options.
///
/// Runs the whole batch pipeline synchronously: resolve configuration,
/// acquire the source tree, walk it, generate the document, invoke the
/// toolchain, copy the result out. All intermediate files live in a scoped
/// temporary directory that is removed on every exit path.
pub fn build_msi(options: BuildOptions) -> Result<BuildReport> {
    let mut diag = Diagnostics::new();
    let config = BuildConfig::resolve(&options, &mut diag);

    let work_dir = tempfile::tempdir().map_err(|e| MsiPackageError::WorkDirError { source: e })?;

    let source_root = source::acquire_source(&options.source, work_dir.path())?;
    let harvest = harvest::walk(&source_root, &config)?;

    let icon_dll = match &config.icon {
        Some(icon) => {
            let output = work_dir.path().join("appico.dll");
            icolib::ico_to_dll(icon, &output)?;
            Some(output)
        }
        None => None,
    };

    let document = wxs::generate_wxs_string(&config, &harvest, icon_dll.as_deref(), &mut diag)?;
    let wxs_path = work_dir.path().join("app.wxs");
    std::fs::write(&wxs_path, &document).map_err(|e| MsiPackageError::OutputWriteError {
        path: wxs_path.clone(),
        source: e,
    })?;

    // The user-visible copy is byte-identical to the one fed to the toolchain
    if let Some(output_wxs) = &config.output_wxs {
        std::fs::copy(&wxs_path, output_wxs).map_err(|e| MsiPackageError::OutputWriteError {
            path: output_wxs.clone(),
            source: e,
        })?;
    }

    let built_msi = toolchain::compile(work_dir.path(), &wxs_path, &config, &mut diag)?;

    std::fs::copy(&built_msi, &config.output_msi).map_err(|e| {
        MsiPackageError::OutputWriteError {
            path: config.output_msi.clone(),
            source: e,
        }
    })?;

    Ok(BuildReport {
        msi_path: config.output_msi.clone(),
        diagnostics: diag,
    })
}
