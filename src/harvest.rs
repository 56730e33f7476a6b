//! Source tree harvesting.
//!
//! Walks the source directory depth-first and mirrors it into installer
//! directory/component/file descriptors. Each file becomes one component
//! holding exactly one file (the key path), registered in the single flat
//! feature. The shortcut target is matched during the walk and returned as
//! part of the result, never tracked through shared state.

use std::fs;
use std::path::Path;

use anyhow::Result;
use uuid::Uuid;

use crate::config::BuildConfig;
use crate::error::MsiPackageError;
use crate::ident::{derive_id, path_uuid, IdRole};

/// Start Menu shortcut attached to a harvested file.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub id: String,
}

/// A single file carried by a component. The file is always the key path.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File name as it appears on disk (and in the installed tree).
    pub name: String,
    /// Absolute path the toolchain reads the file contents from.
    pub source: std::path::PathBuf,
    pub id: String,
    pub shortcut: Option<Shortcut>,
}

/// One component per file; the v5 UUID of the logical path is its GUID.
#[derive(Debug, Clone)]
pub struct ComponentNode {
    pub id: String,
    pub guid: Uuid,
    pub file: FileEntry,
}

/// Mirror of one source directory.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    pub id: String,
    pub name: String,
    pub contents: DirContents,
}

/// Ordered children of a directory: subdirectories first, then components.
#[derive(Debug, Clone, Default)]
pub struct DirContents {
    pub directories: Vec<DirectoryNode>,
    pub components: Vec<ComponentNode>,
}

impl DirContents {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.components.is_empty()
    }
}

/// The shortcut created during a walk, if the configured target was found.
#[derive(Debug, Clone)]
pub struct ShortcutRef {
    /// Configured install-relative target path (as given on the command line).
    pub target: String,
    /// UUID of the target's logical path; seeds the shortcut and icon ids.
    pub uuid: Uuid,
    pub id: String,
}

/// Result of walking a source tree.
#[derive(Debug, Clone)]
pub struct Harvest {
    /// Contents of the install directory.
    pub contents: DirContents,
    /// Component identifiers in emission order, for the feature block.
    pub component_ids: Vec<String>,
    pub shortcut: Option<ShortcutRef>,
}

struct WalkCtx<'a> {
    namespace: &'a Uuid,
    /// Configured shortcut target as a full logical path, if any.
    shortcut_target: Option<String>,
    shortcut_arg: Option<&'a str>,
    component_ids: Vec<String>,
    shortcut: Option<ShortcutRef>,
}

/// Walk `source_root` and build the installer tree for it.
///
/// Sibling entries are sorted by file name so the resulting document is
/// deterministic for a given configuration and tree. Identifiers are derived
/// from logical paths and never depend on traversal order.
pub fn walk(source_root: &Path, config: &BuildConfig) -> Result<Harvest> {
    let source_root =
        fs::canonicalize(source_root).map_err(|e| MsiPackageError::SourceReadError {
            path: source_root.to_path_buf(),
            source: e,
        })?;

    let install_path = config.install_dir_logical_path();
    let mut ctx = WalkCtx {
        namespace: &config.upgrade_code,
        shortcut_target: config
            .shortcut
            .as_deref()
            .map(|s| format!("{}/{}", install_path, s.to_uppercase())),
        shortcut_arg: config.shortcut.as_deref(),
        component_ids: Vec::new(),
        shortcut: None,
    };

    let contents = walk_dir(&source_root, &install_path, &mut ctx)?;

    Ok(Harvest {
        contents,
        component_ids: ctx.component_ids,
        shortcut: ctx.shortcut,
    })
}

fn walk_dir(
    dir: &Path,
    logical_prefix: &str,
    ctx: &mut WalkCtx,
) -> Result<DirContents, MsiPackageError> {
    let read_err = |e: std::io::Error| MsiPackageError::SourceReadError {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    entries.sort_by_key(|e| e.file_name());

    let mut contents = DirContents::default();

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let logical = format!("{}/{}", logical_prefix, name.to_uppercase());
        let file_type = entry.file_type().map_err(read_err)?;

        if file_type.is_dir() {
            contents.directories.push(DirectoryNode {
                id: derive_id(IdRole::Directory, ctx.namespace, &logical),
                name,
                contents: walk_dir(&entry.path(), &logical, ctx)?,
            });
        } else {
            let uuid = path_uuid(ctx.namespace, &logical);
            let component_id = derive_id(IdRole::Component, ctx.namespace, &logical);

            let shortcut = if ctx.shortcut_target.as_deref() == Some(logical.as_str()) {
                let id = derive_id(IdRole::Shortcut, ctx.namespace, &logical);
                ctx.shortcut = Some(ShortcutRef {
                    target: ctx.shortcut_arg.unwrap_or_default().to_string(),
                    uuid,
                    id: id.clone(),
                });
                Some(Shortcut { id })
            } else {
                None
            };

            ctx.component_ids.push(component_id.clone());
            contents.components.push(ComponentNode {
                id: component_id,
                guid: uuid,
                file: FileEntry {
                    source: entry.path(),
                    id: derive_id(IdRole::File, ctx.namespace, &logical),
                    name,
                    shortcut,
                },
            });
        }
    }

    Ok(contents)
}
