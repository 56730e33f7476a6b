//! WiX source (.wxs) document generation.
//!
//! Assembles the installer description consumed by the WiX toolchain. The
//! block order inside `<Product>` is fixed (metadata, package, media, upgrade
//! policy, directory tree, feature, properties, UI, variables, icon) and must
//! not be reordered: the toolchain's schema validation depends on it.

use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::config::BuildConfig;
use crate::diag::Diagnostics;
use crate::harvest::{ComponentNode, DirContents, Harvest};

const WIX_NAMESPACE: &str = "http://schemas.microsoft.com/wix/2006/wi";

/// Icon id used when no shortcut exists to qualify the extension.
const DEFAULT_ICON_ID: &str = "app.ico";

/// Generate the full .wxs document into `writer`.
///
/// `icon_source` is the already-converted icon resource library to reference;
/// `None` omits the icon block entirely. A configured shortcut target that
/// the walk never found is warned about here; the document then simply lacks
/// Start Menu integration.
pub fn generate_wxs<W: Write>(
    writer: W,
    config: &BuildConfig,
    harvest: &Harvest,
    icon_source: Option<&Path>,
    diag: &mut Diagnostics,
) -> anyhow::Result<()> {
    if let Some(target) = &config.shortcut {
        if harvest.shortcut.is_none() {
            diag.warn(format!("couldn't create shortcut {}: file not found", target));
        }
    }

    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut wix = BytesStart::new("Wix");
    wix.push_attribute(("xmlns", WIX_NAMESPACE));
    xml.write_event(Event::Start(wix))?;

    let codepage = config.codepage.to_string();
    let language = config.language.to_string();
    let upgrade_code = config.upgrade_code.to_string();

    let product = BytesStart::new("Product").with_attributes([
        ("Name", config.product_name.as_str()),
        ("Id", "*"),
        ("UpgradeCode", upgrade_code.as_str()),
        ("Codepage", codepage.as_str()),
        ("Manufacturer", config.manufacturer.as_str()),
        ("Version", config.version.as_str()),
        ("Language", language.as_str()),
    ]);
    xml.write_event(Event::Start(product))?;

    write_empty(
        &mut xml,
        "Package",
        &[
            ("Id", "*"),
            ("InstallerVersion", "200"),
            ("Compressed", "yes"),
            ("Languages", language.as_str()),
            ("SummaryCodepage", codepage.as_str()),
            ("Description", config.product_name.as_str()),
            ("Manufacturer", config.manufacturer.as_str()),
        ],
    )?;

    // One embedded cabinet covers every file
    write_empty(
        &mut xml,
        "Media",
        &[("Id", "1"), ("Cabinet", "Media1.cab"), ("EmbedCab", "yes")],
    )?;

    // Re-running with a lower version must still succeed
    write_empty(
        &mut xml,
        "MajorUpgrade",
        &[
            ("AllowDowngrades", "yes"),
            ("Schedule", "afterInstallExecute"),
        ],
    )?;

    write_directory_tree(&mut xml, config, harvest, icon_source)?;

    write_feature(&mut xml, harvest)?;

    // REINSTALLMODE amus is safe here: no shared components, major upgrades
    // only, exactly one file per component
    write_property(&mut xml, "REINSTALLMODE", "amus")?;

    // The culture tag itself only affects the linker invocation
    if config.ui_culture.is_some() {
        write_property(&mut xml, "WIXUI_INSTALLDIR", "INSTALLDIR")?;
        write_empty(&mut xml, "UIRef", &[("Id", "WixUI_InstallDir")])?;
        // No repair/modify path exists; hide the Modify button once installed
        write_empty(
            &mut xml,
            "SetProperty",
            &[
                ("Id", "ARPNOMODIFY"),
                ("Value", "1"),
                ("After", "InstallValidate"),
                ("Sequence", "execute"),
            ],
        )?;
    } else {
        write_property(&mut xml, "ARPNOMODIFY", "yes")?;
    }

    for variable in &config.variables {
        write_empty(
            &mut xml,
            "WixVariable",
            &[
                ("Id", variable.name.as_str()),
                ("Value", variable.value.as_str()),
            ],
        )?;
    }

    if let Some(icon_source) = icon_source {
        let id = icon_id(harvest);
        let source = icon_source.display().to_string();
        write_empty(
            &mut xml,
            "Icon",
            &[("Id", id.as_str()), ("SourceFile", source.as_str())],
        )?;
        write_property(&mut xml, "ARPPRODUCTICON", &id)?;
    }

    xml.write_event(Event::End(BytesEnd::new("Product")))?;
    xml.write_event(Event::End(BytesEnd::new("Wix")))?;

    Ok(())
}

/// Generate the .wxs document as a UTF-8 string.
pub fn generate_wxs_string(
    config: &BuildConfig,
    harvest: &Harvest,
    icon_source: Option<&Path>,
    diag: &mut Diagnostics,
) -> anyhow::Result<String> {
    let mut buffer = Cursor::new(Vec::with_capacity(16 * 1024));
    generate_wxs(&mut buffer, config, harvest, icon_source, diag)?;
    Ok(String::from_utf8(buffer.into_inner())?)
}

/// Identifier for the icon resource.
///
/// Installer quirk: a shortcut's icon id must carry the same file extension
/// as the shortcut target, upper-cased. Without a shortcut a fixed id is used.
pub fn icon_id(harvest: &Harvest) -> String {
    match &harvest.shortcut {
        Some(shortcut) => {
            let extension = Path::new(&shortcut.target)
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_uppercase()))
                .unwrap_or_default();
            format!("Icon_{}{}", shortcut.uuid.simple(), extension)
        }
        None => DEFAULT_ICON_ID.to_string(),
    }
}

/// Attributes for the single shortcut element, resolved up front.
struct ShortcutEmit<'a> {
    /// Shortcut display name: the product name.
    name: &'a str,
    icon: Option<String>,
}

fn write_directory_tree<W: Write>(
    xml: &mut Writer<W>,
    config: &BuildConfig,
    harvest: &Harvest,
    icon_source: Option<&Path>,
) -> anyhow::Result<()> {
    let shortcut_emit = ShortcutEmit {
        name: &config.product_name,
        icon: match (icon_source, &harvest.shortcut) {
            (Some(_), Some(_)) => Some(icon_id(harvest)),
            _ => None,
        },
    };

    write_start(
        xml,
        "Directory",
        &[("Id", "TARGETDIR"), ("Name", "SourceDir")],
    )?;
    write_start(
        xml,
        "Directory",
        &[("Id", config.arch.program_files_id()), ("Name", "ProgramFiles")],
    )?;

    let installdir = [("Id", "INSTALLDIR"), ("Name", config.product_name.as_str())];
    if harvest.contents.is_empty() {
        write_empty(xml, "Directory", &installdir)?;
    } else {
        write_start(xml, "Directory", &installdir)?;
        write_dir_contents(xml, &harvest.contents, &shortcut_emit)?;
        xml.write_event(Event::End(BytesEnd::new("Directory")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("Directory")))?;

    // Advertised shortcuts need the Start Menu folder declared
    if harvest.shortcut.is_some() {
        write_empty(
            xml,
            "Directory",
            &[("Id", "ProgramMenuFolder"), ("Name", "All Programs")],
        )?;
    }

    xml.write_event(Event::End(BytesEnd::new("Directory")))?;
    Ok(())
}

fn write_dir_contents<W: Write>(
    xml: &mut Writer<W>,
    contents: &DirContents,
    shortcut: &ShortcutEmit,
) -> anyhow::Result<()> {
    for dir in &contents.directories {
        let attrs = [("Name", dir.name.as_str()), ("Id", dir.id.as_str())];
        if dir.contents.is_empty() {
            // Empty directories still need their full chain declared
            write_empty(xml, "Directory", &attrs)?;
        } else {
            write_start(xml, "Directory", &attrs)?;
            write_dir_contents(xml, &dir.contents, shortcut)?;
            xml.write_event(Event::End(BytesEnd::new("Directory")))?;
        }
    }
    for component in &contents.components {
        write_component(xml, component, shortcut)?;
    }
    Ok(())
}

fn write_component<W: Write>(
    xml: &mut Writer<W>,
    component: &ComponentNode,
    shortcut_emit: &ShortcutEmit,
) -> anyhow::Result<()> {
    let guid = component.guid.to_string();
    write_start(
        xml,
        "Component",
        &[("Id", component.id.as_str()), ("Guid", guid.as_str())],
    )?;

    let file = &component.file;
    let source = file.source.display().to_string();
    let attrs = [
        ("Name", file.name.as_str()),
        ("DiskId", "1"),
        ("Source", source.as_str()),
        ("KeyPath", "yes"),
        ("Id", file.id.as_str()),
    ];

    match &file.shortcut {
        Some(shortcut) => {
            write_start(xml, "File", &attrs)?;
            let mut el = BytesStart::new("Shortcut").with_attributes([
                ("Id", shortcut.id.as_str()),
                ("Directory", "ProgramMenuFolder"),
                ("Advertise", "yes"),
                ("Name", shortcut_emit.name),
            ]);
            if let Some(icon) = &shortcut_emit.icon {
                el.push_attribute(("Icon", icon.as_str()));
            }
            xml.write_event(Event::Empty(el))?;
            xml.write_event(Event::End(BytesEnd::new("File")))?;
        }
        None => write_empty(xml, "File", &attrs)?,
    }

    xml.write_event(Event::End(BytesEnd::new("Component")))?;

    Ok(())
}

fn write_feature<W: Write>(xml: &mut Writer<W>, harvest: &Harvest) -> anyhow::Result<()> {
    let attrs = [("Id", "Complete"), ("Level", "1")];
    if harvest.component_ids.is_empty() {
        // Empty source tree: the feature is still declared
        write_empty(xml, "Feature", &attrs)?;
        return Ok(());
    }
    write_start(xml, "Feature", &attrs)?;
    for id in &harvest.component_ids {
        write_empty(xml, "ComponentRef", &[("Id", id.as_str())])?;
    }
    xml.write_event(Event::End(BytesEnd::new("Feature")))?;
    Ok(())
}

/// Write a `<Property Id=".." Value=".."/>` element.
fn write_property<W: Write>(xml: &mut Writer<W>, id: &str, value: &str) -> anyhow::Result<()> {
    write_empty(xml, "Property", &[("Id", id), ("Value", value)])
}

fn write_start<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    attrs: &[(&str, &str)],
) -> anyhow::Result<()> {
    let el = BytesStart::new(name).with_attributes(attrs.iter().copied());
    xml.write_event(Event::Start(el))?;
    Ok(())
}

fn write_empty<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    attrs: &[(&str, &str)],
) -> anyhow::Result<()> {
    let el = BytesStart::new(name).with_attributes(attrs.iter().copied());
    xml.write_event(Event::Empty(el))?;
    Ok(())
}
