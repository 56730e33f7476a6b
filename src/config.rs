//! Build configuration resolution.
//!
//! Turns raw [`BuildOptions`](crate::BuildOptions) into a fully resolved
//! [`BuildConfig`]: defaults applied, generated values filled in, and every
//! applied default surfaced as a warning. The tool prefers always producing
//! output over always producing stable output, so a missing version or
//! upgrade code warns instead of failing.

use std::path::PathBuf;

use uuid::Uuid;

use crate::diag::Diagnostics;
use crate::BuildOptions;

/// Version used when none was supplied.
pub const DEFAULT_VERSION: &str = "0.0.1";

/// Target installer architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Architecture {
    #[default]
    X86,
    X64,
}

impl Architecture {
    /// Value for the WiX compiler's `-arch` flag.
    pub fn candle_arch(self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
        }
    }

    /// Standard directory id of the matching Program Files folder.
    pub fn program_files_id(self) -> &'static str {
        match self {
            Architecture::X86 => "ProgramFilesFolder",
            Architecture::X64 => "ProgramFiles64Folder",
        }
    }
}

/// A user-supplied WixVariable definition, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WixVariable {
    pub name: String,
    pub value: String,
}

/// Parse a `NAME=VALUE` argument. A missing `=` yields an empty value.
pub fn parse_variable(raw: &str) -> WixVariable {
    match raw.split_once('=') {
        Some((name, value)) => WixVariable {
            name: name.to_string(),
            value: value.to_string(),
        },
        None => WixVariable {
            name: raw.to_string(),
            value: String::new(),
        },
    }
}

/// Fully resolved, immutable configuration for one build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub product_name: String,
    pub manufacturer: String,
    pub version: String,
    /// Namespace for all derived identifiers and the upgrade policy.
    pub upgrade_code: Uuid,
    pub codepage: u32,
    pub language: u32,
    pub arch: Architecture,
    /// Install-relative path of the file to receive a Start Menu shortcut.
    pub shortcut: Option<String>,
    pub icon: Option<PathBuf>,
    /// Culture tag enabling the WixUI_InstallDir dialog set.
    pub ui_culture: Option<String>,
    pub variables: Vec<WixVariable>,
    pub output_msi: PathBuf,
    pub output_wxs: Option<PathBuf>,
}

impl BuildConfig {
    /// Resolve options into a configuration, warning for each applied default.
    pub fn resolve(options: &BuildOptions, diag: &mut Diagnostics) -> Self {
        let manufacturer = options
            .manufacturer
            .clone()
            .unwrap_or_else(|| options.name.clone());

        let upgrade_code = match options.upgrade_code {
            Some(code) => code,
            None => {
                let generated = Uuid::new_v4();
                diag.warn(format!(
                    "no UpgradeCode specified, generating one for you: --upgrade-code={}",
                    generated
                ));
                generated
            }
        };

        let version = match &options.version {
            Some(version) => version.clone(),
            None => {
                diag.warn(format!(
                    "no version specified, generating one for you: --version={}",
                    DEFAULT_VERSION
                ));
                DEFAULT_VERSION.to_string()
            }
        };

        let arch = if options.x64 {
            Architecture::X64
        } else {
            Architecture::X86
        };

        BuildConfig {
            product_name: options.name.clone(),
            manufacturer,
            version,
            upgrade_code,
            codepage: options.codepage,
            language: options.language,
            arch,
            shortcut: options.shortcut.clone(),
            icon: options.icon.clone(),
            ui_culture: options.with_ui.clone(),
            variables: options.variables.iter().map(|v| parse_variable(v)).collect(),
            output_msi: options.output_msi.clone(),
            output_wxs: options.output_wxs.clone(),
        }
    }

    /// Root of the logical path space seeding identifier derivation.
    ///
    /// Matches the directory chain emitted in the document: the Program Files
    /// folder id joined with the product-named install directory. The product
    /// name is used verbatim; only entry names below it are case-normalized.
    pub fn install_dir_logical_path(&self) -> String {
        format!("{}/{}", self.arch.program_files_id(), self.product_name)
    }
}
