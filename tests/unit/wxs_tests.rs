//! Unit tests for .wxs document generation
//!
//! These tests parse the generated document and assert on its structure:
//! block order, the directory chain, feature membership, UI variants, and
//! the icon identifier quirk.

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_msipackage::diag::Diagnostics;
use rust_msipackage::wxs;

use crate::common::{
    count_elements, document, product_child_names, test_config, test_options, walk_tree,
    SourceTree,
};

fn property_value(xml: &str, id: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(xml).unwrap();
    doc.descendants()
        .find(|n| n.tag_name().name() == "Property" && n.attribute("Id") == Some(id))
        .and_then(|n| n.attribute("Value").map(str::to_string))
}

#[test]
fn test_product_and_package_metadata() {
    let tree = SourceTree::new();
    tree.file("app.exe", "x");
    let config = test_config(&test_options(tree.root()));
    let xml = document(&config, &walk_tree(&tree, &config), None);

    let doc = roxmltree::Document::parse(&xml).unwrap();
    assert_eq!(doc.root_element().tag_name().name(), "Wix");

    let product = doc
        .descendants()
        .find(|n| n.tag_name().name() == "Product")
        .unwrap();
    assert_eq!(product.attribute("Name"), Some("Test App"));
    assert_eq!(product.attribute("Id"), Some("*"));
    assert_eq!(
        product.attribute("UpgradeCode"),
        Some("12345678-1234-5678-1234-567812345678")
    );
    assert_eq!(product.attribute("Codepage"), Some("1252"));
    assert_eq!(product.attribute("Manufacturer"), Some("Test App"));
    assert_eq!(product.attribute("Version"), Some("1.2.3"));
    assert_eq!(product.attribute("Language"), Some("0"));

    let package = doc
        .descendants()
        .find(|n| n.tag_name().name() == "Package")
        .unwrap();
    assert_eq!(package.attribute("InstallerVersion"), Some("200"));
    assert_eq!(package.attribute("Compressed"), Some("yes"));
    assert_eq!(package.attribute("Description"), Some("Test App"));

    let media = doc
        .descendants()
        .find(|n| n.tag_name().name() == "Media")
        .unwrap();
    assert_eq!(media.attribute("Id"), Some("1"));
    assert_eq!(media.attribute("Cabinet"), Some("Media1.cab"));
    assert_eq!(media.attribute("EmbedCab"), Some("yes"));

    let upgrade = doc
        .descendants()
        .find(|n| n.tag_name().name() == "MajorUpgrade")
        .unwrap();
    assert_eq!(upgrade.attribute("AllowDowngrades"), Some("yes"));
    assert_eq!(upgrade.attribute("Schedule"), Some("afterInstallExecute"));
}

#[test]
fn test_product_block_order() {
    let tree = SourceTree::new();
    tree.file("app.exe", "x");
    let mut options = test_options(tree.root());
    options.variables = vec!["Key=Value".to_string()];
    let config = test_config(&options);
    let xml = document(&config, &walk_tree(&tree, &config), None);

    assert_eq!(
        product_child_names(&xml),
        [
            "Package",
            "Media",
            "MajorUpgrade",
            "Directory",
            "Feature",
            "Property",    // REINSTALLMODE
            "Property",    // ARPNOMODIFY (no UI requested)
            "WixVariable",
        ]
    );
}

#[test]
fn test_components_referenced_exactly_once_from_single_feature() {
    let tree = SourceTree::new();
    tree.file("a.txt", "x")
        .file("b.txt", "x")
        .file("sub/c.txt", "x")
        .file("sub/deep/d.txt", "x");
    let config = test_config(&test_options(tree.root()));
    let xml = document(&config, &walk_tree(&tree, &config), None);

    assert_eq!(count_elements(&xml, "Feature"), 1);
    assert_eq!(count_elements(&xml, "Component"), 4);
    assert_eq!(count_elements(&xml, "ComponentRef"), 4);

    let doc = roxmltree::Document::parse(&xml).unwrap();
    let mut component_ids: Vec<&str> = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "Component")
        .filter_map(|n| n.attribute("Id"))
        .collect();
    let mut ref_ids: Vec<&str> = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "ComponentRef")
        .filter_map(|n| n.attribute("Id"))
        .collect();
    component_ids.sort();
    ref_ids.sort();
    assert_eq!(component_ids, ref_ids);

    // Every file is its component's key path
    let key_paths = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "File")
        .filter(|n| n.attribute("KeyPath") == Some("yes"))
        .count();
    assert_eq!(key_paths, 4);
}

#[test]
fn test_directory_chain_follows_architecture() {
    let tree = SourceTree::new();
    tree.file("app.exe", "x");

    let config = test_config(&test_options(tree.root()));
    let xml = document(&config, &walk_tree(&tree, &config), None);
    assert!(xml.contains(r#"Id="ProgramFilesFolder""#));

    let mut options = test_options(tree.root());
    options.x64 = true;
    let config = test_config(&options);
    let xml = document(&config, &walk_tree(&tree, &config), None);
    assert!(xml.contains(r#"Id="ProgramFiles64Folder""#));

    let doc = roxmltree::Document::parse(&xml).unwrap();
    let installdir = doc
        .descendants()
        .find(|n| n.attribute("Id") == Some("INSTALLDIR"))
        .unwrap();
    assert_eq!(installdir.attribute("Name"), Some("Test App"));
    assert_eq!(
        installdir.parent_element().unwrap().attribute("Id"),
        Some("ProgramFiles64Folder")
    );
    assert_eq!(
        doc.descendants()
            .find(|n| n.attribute("Id") == Some("TARGETDIR"))
            .unwrap()
            .attribute("Name"),
        Some("SourceDir")
    );
}

#[test]
fn test_shortcut_is_advertised_from_start_menu() {
    let tree = SourceTree::new();
    tree.file("bin/app.exe", "x");
    let mut options = test_options(tree.root());
    options.shortcut = Some("bin/app.exe".to_string());
    let config = test_config(&options);
    let xml = document(&config, &walk_tree(&tree, &config), None);

    let doc = roxmltree::Document::parse(&xml).unwrap();
    let shortcut = doc
        .descendants()
        .find(|n| n.tag_name().name() == "Shortcut")
        .expect("shortcut element should be emitted");
    assert_eq!(shortcut.attribute("Directory"), Some("ProgramMenuFolder"));
    assert_eq!(shortcut.attribute("Advertise"), Some("yes"));
    assert_eq!(shortcut.attribute("Name"), Some("Test App"));
    assert_eq!(shortcut.parent_element().unwrap().tag_name().name(), "File");

    // Advertised shortcuts need the Start Menu folder declared
    assert!(doc
        .descendants()
        .any(|n| n.attribute("Id") == Some("ProgramMenuFolder")));
}

#[test]
fn test_missing_shortcut_target_warns_and_omits_integration() {
    let tree = SourceTree::new();
    tree.file("bin/app.exe", "x");
    let mut options = test_options(tree.root());
    options.shortcut = Some("bin/missing.exe".to_string());
    let config = test_config(&options);
    let harvest = walk_tree(&tree, &config);

    let mut diag = Diagnostics::new();
    let xml = wxs::generate_wxs_string(&config, &harvest, None, &mut diag).unwrap();

    assert_eq!(diag.warnings().len(), 1);
    assert!(diag.warnings()[0].contains("bin/missing.exe"));
    assert_eq!(count_elements(&xml, "Shortcut"), 0);
    assert!(!xml.contains("ProgramMenuFolder"));
}

#[test]
fn test_icon_id_carries_shortcut_extension() {
    let tree = SourceTree::new();
    tree.file("bin/app.exe", "x");
    let mut options = test_options(tree.root());
    options.shortcut = Some("bin/app.exe".to_string());
    let config = test_config(&options);
    let harvest = walk_tree(&tree, &config);

    let icon_id = wxs::icon_id(&harvest);
    assert!(icon_id.starts_with("Icon_"));
    assert!(icon_id.ends_with(".EXE"));

    let xml = document(&config, &harvest, Some(Path::new("appico.dll")));
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let icon = doc
        .descendants()
        .find(|n| n.tag_name().name() == "Icon")
        .expect("icon element should be emitted");
    assert_eq!(icon.attribute("Id"), Some(icon_id.as_str()));
    assert_eq!(icon.attribute("SourceFile"), Some("appico.dll"));
    assert_eq!(property_value(&xml, "ARPPRODUCTICON"), Some(icon_id.clone()));

    let shortcut = doc
        .descendants()
        .find(|n| n.tag_name().name() == "Shortcut")
        .unwrap();
    assert_eq!(shortcut.attribute("Icon"), Some(icon_id.as_str()));
}

#[test]
fn test_icon_without_shortcut_uses_fixed_id() {
    let tree = SourceTree::new();
    tree.file("app.exe", "x");
    let config = test_config(&test_options(tree.root()));
    let harvest = walk_tree(&tree, &config);

    assert_eq!(wxs::icon_id(&harvest), "app.ico");

    let xml = document(&config, &harvest, Some(Path::new("appico.dll")));
    assert_eq!(property_value(&xml, "ARPPRODUCTICON"), Some("app.ico".to_string()));
}

#[test]
fn test_ui_block_variants() {
    let tree = SourceTree::new();
    tree.file("app.exe", "x");

    // Without UI: modify is disabled directly
    let config = test_config(&test_options(tree.root()));
    let xml = document(&config, &walk_tree(&tree, &config), None);
    assert_eq!(property_value(&xml, "ARPNOMODIFY"), Some("yes".to_string()));
    assert_eq!(count_elements(&xml, "UIRef"), 0);
    assert_eq!(count_elements(&xml, "SetProperty"), 0);

    // With UI: install-dir dialog set plus post-validation modify disable
    let mut options = test_options(tree.root());
    options.with_ui = Some("en-us".to_string());
    let config = test_config(&options);
    let xml = document(&config, &walk_tree(&tree, &config), None);

    assert_eq!(
        property_value(&xml, "WIXUI_INSTALLDIR"),
        Some("INSTALLDIR".to_string())
    );
    let doc = roxmltree::Document::parse(&xml).unwrap();
    assert!(doc
        .descendants()
        .any(|n| n.tag_name().name() == "UIRef"
            && n.attribute("Id") == Some("WixUI_InstallDir")));
    let set_property = doc
        .descendants()
        .find(|n| n.tag_name().name() == "SetProperty")
        .unwrap();
    assert_eq!(set_property.attribute("Id"), Some("ARPNOMODIFY"));
    assert_eq!(set_property.attribute("After"), Some("InstallValidate"));
    assert_eq!(set_property.attribute("Sequence"), Some("execute"));
    assert_eq!(property_value(&xml, "ARPNOMODIFY"), None);
}

#[test]
fn test_reinstall_mode_is_pinned() {
    let tree = SourceTree::new();
    tree.file("app.exe", "x");
    let config = test_config(&test_options(tree.root()));
    let xml = document(&config, &walk_tree(&tree, &config), None);
    assert_eq!(property_value(&xml, "REINSTALLMODE"), Some("amus".to_string()));
}

#[test]
fn test_variables_are_emitted_verbatim_in_order() {
    let tree = SourceTree::new();
    tree.file("app.exe", "x");
    let mut options = test_options(tree.root());
    options.variables = vec![
        "WixUILicenseRtf=license.rtf".to_string(),
        "Bare".to_string(),
    ];
    let config = test_config(&options);
    let xml = document(&config, &walk_tree(&tree, &config), None);

    let doc = roxmltree::Document::parse(&xml).unwrap();
    let variables: Vec<(&str, &str)> = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "WixVariable")
        .map(|n| (n.attribute("Id").unwrap(), n.attribute("Value").unwrap()))
        .collect();
    assert_eq!(
        variables,
        [("WixUILicenseRtf", "license.rtf"), ("Bare", "")]
    );
}

#[test]
fn test_empty_tree_still_produces_valid_document() {
    let tree = SourceTree::new();
    tree.dir("plugins");
    let config = test_config(&test_options(tree.root()));
    let xml = document(&config, &walk_tree(&tree, &config), None);

    // TARGETDIR, ProgramFilesFolder, INSTALLDIR and the one empty directory
    assert_eq!(count_elements(&xml, "Directory"), 4);
    assert_eq!(count_elements(&xml, "Component"), 0);
    assert_eq!(count_elements(&xml, "Feature"), 1);
}

#[test]
fn test_attribute_values_are_escaped() {
    let tree = SourceTree::new();
    tree.file("app.exe", "x");
    let mut options = test_options(tree.root());
    options.name = "Fish & Chips <Deluxe>".to_string();
    let config = test_config(&options);
    let xml = document(&config, &walk_tree(&tree, &config), None);

    let doc = roxmltree::Document::parse(&xml).unwrap();
    let product = doc
        .descendants()
        .find(|n| n.tag_name().name() == "Product")
        .unwrap();
    assert_eq!(product.attribute("Name"), Some("Fish & Chips <Deluxe>"));
}

#[test]
fn test_document_generation_is_deterministic() {
    let tree = SourceTree::new();
    tree.file("b.txt", "x").file("a.txt", "x").file("sub/c.txt", "x");
    let config = test_config(&test_options(tree.root()));

    let first = document(&config, &walk_tree(&tree, &config), None);
    let second = document(&config, &walk_tree(&tree, &config), None);
    assert_eq!(first, second);
}
