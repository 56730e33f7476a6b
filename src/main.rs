use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use uuid::Uuid;

use rust_msipackage::{build_msi, BuildOptions};

#[derive(Parser)]
#[command(name = "rust-msipackage")]
#[command(author, about = "Builds a simple Windows .msi installer from a directory or zip archive")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Path for the output .msi file
    #[arg(short = 'o', long, value_name = "PATH/TO/OUT.MSI")]
    output_msi: PathBuf,

    /// Also write the generated .wxs document to this path
    #[arg(long, value_name = "PATH/TO/OUT.WXS")]
    output_wxs: Option<PathBuf>,

    /// UpgradeCode GUID; generated (with a warning) when omitted
    #[arg(long)]
    upgrade_code: Option<Uuid>,

    /// Product version; defaults to 0.0.1 (with a warning) when omitted
    #[arg(long)]
    version: Option<String>,

    /// Product name shown in Add/Remove Programs
    #[arg(long, value_name = "My Application")]
    name: String,

    /// Manufacturer; defaults to the product name
    #[arg(long)]
    manufacturer: Option<String>,

    /// Install-relative path of the file to receive a Start Menu shortcut
    #[arg(long, value_name = "RELATIVE/PATH/TO/APP.EXE")]
    shortcut: Option<String>,

    /// Summary-information codepage
    #[arg(long, default_value_t = 1252)]
    codepage: u32,

    /// Installer language id
    #[arg(long, default_value_t = 0)]
    language: u32,

    /// Icon file to embed and reference from the shortcut and ARP entry
    #[arg(long, value_name = "PATH/TO/FILE.ICO")]
    icon: Option<PathBuf>,

    /// Add the WixUI_InstallDir dialog set for the given culture
    #[arg(long, value_name = "CULTURE")]
    with_ui: Option<String>,

    /// Build a 64-bit installer
    #[arg(long)]
    x64: bool,

    /// NAME=VALUE WixVariable definition (repeatable)
    #[arg(short = 'd', long = "variable", value_name = "NAME=VALUE")]
    variables: Vec<String>,

    /// Source directory or zip archive
    source: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    build_msi(BuildOptions {
        source: cli.source,
        output_msi: cli.output_msi,
        output_wxs: cli.output_wxs,
        name: cli.name,
        manufacturer: cli.manufacturer,
        version: cli.version,
        upgrade_code: cli.upgrade_code,
        codepage: cli.codepage,
        language: cli.language,
        x64: cli.x64,
        shortcut: cli.shortcut,
        icon: cli.icon,
        with_ui: cli.with_ui,
        variables: cli.variables,
    })?;

    Ok(())
}
