//! External WiX toolchain invocation.
//!
//! On Windows the generated document goes through the classic three-stage
//! pipeline: `candle` (compile), `light` (link) and `smoke` (validate).
//! Compile and link failures are fatal; validation is advisory and only
//! warns. Elsewhere a single `wixl` invocation produces the installer.
//! Every tool runs exactly once, located on PATH.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;

use crate::config::BuildConfig;
use crate::diag::Diagnostics;
use crate::error::MsiPackageError;

/// Compile the document at `wxs_path` into an installer inside `work_dir`.
///
/// Returns the path of the produced `.msi`, still inside the working
/// directory; the caller copies it to its final destination.
#[cfg(windows)]
pub fn compile(
    work_dir: &Path,
    wxs_path: &Path,
    config: &BuildConfig,
    diag: &mut Diagnostics,
) -> Result<PathBuf> {
    let wixobj = work_dir.join("app.wixobj");
    let msi = work_dir.join("app.msi");

    let mut candle = Command::new(locate("candle")?);
    candle
        .args(["-nologo", "-arch", config.arch.candle_arch()])
        .arg("-out")
        .arg(&wixobj)
        .arg(wxs_path);
    run_tool(&mut candle, "candle")?;

    let mut light = Command::new(locate("light")?);
    // -sval: validation runs as its own advisory stage below
    light.args(["-nologo", "-sval"]);
    if let Some(culture) = &config.ui_culture {
        light
            .args(["-ext", "WixUIExtension"])
            .arg(format!("-cultures:{}", culture));
    }
    light.arg("-out").arg(&msi).arg(&wixobj);
    run_tool(&mut light, "light")?;

    validate(&msi, diag);

    Ok(msi)
}

/// Single-stage build through `wixl` (msitools).
#[cfg(not(windows))]
pub fn compile(
    work_dir: &Path,
    wxs_path: &Path,
    _config: &BuildConfig,
    _diag: &mut Diagnostics,
) -> Result<PathBuf> {
    let msi = work_dir.join("app.msi");

    let mut wixl = Command::new(locate("wixl")?);
    wixl.arg("-o").arg(&msi).arg(wxs_path);
    run_tool(&mut wixl, "wixl")?;

    Ok(msi)
}

/// Advisory MSI validation; failures become warnings.
///
/// ICE61 (same-version upgrade) and ICE40 (REINSTALLMODE) fire by design
/// here and are suppressed.
#[cfg(windows)]
fn validate(msi: &Path, diag: &mut Diagnostics) {
    let smoke = match locate("smoke") {
        Ok(path) => path,
        Err(e) => {
            diag.warn(format!("MSI validation skipped: {}", e));
            return;
        }
    };

    let mut cmd = Command::new(smoke);
    cmd.args(["-nologo", "-sice:ICE61", "-sice:ICE40"]).arg(msi);
    if let Err(e) = run_tool(&mut cmd, "smoke") {
        diag.warn(format!("MSI validation failed: {}", e));
    }
}

/// Locate a toolchain binary on PATH.
fn locate(tool: &'static str) -> Result<PathBuf, MsiPackageError> {
    which::which(tool).map_err(|_| MsiPackageError::ToolNotFound { tool })
}

/// Run one external tool to completion, inheriting its output streams.
fn run_tool(cmd: &mut Command, tool: &'static str) -> Result<(), MsiPackageError> {
    let status = cmd
        .status()
        .map_err(|e| MsiPackageError::ToolSpawnError { tool, source: e })?;
    if !status.success() {
        return Err(MsiPackageError::ToolFailed { tool, status });
    }
    Ok(())
}
