//! Stable identifier derivation for installer elements.
//!
//! WiX requires identifiers in three separate spaces (directory, component,
//! file) that must start with a letter and contain no separator characters.
//! All of them are derived from the same name-based UUID: version 5 of the
//! logical path under the upgrade-code namespace, so identical inputs always
//! produce identical tokens regardless of traversal order or platform.

use uuid::Uuid;

/// Identifier namespace an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRole {
    Directory,
    Component,
    File,
    Shortcut,
}

impl IdRole {
    /// Alphabetic tag keeping the derived token a valid WiX identifier.
    fn prefix(self) -> &'static str {
        match self {
            IdRole::Directory => "Dir_",
            IdRole::Component => "Comp_",
            IdRole::File => "File_",
            IdRole::Shortcut => "Shortcut_",
        }
    }
}

/// Name-based UUID for a logical path under the upgrade-code namespace.
///
/// This is the single source of identity for everything derived from a path:
/// element identifiers use its hex form, component GUIDs its hyphenated form.
pub fn path_uuid(namespace: &Uuid, logical_path: &str) -> Uuid {
    Uuid::new_v5(namespace, logical_path.as_bytes())
}

/// Derive the installer identifier for `logical_path` in the given role.
///
/// The token is the role prefix followed by the 32 lowercase hex digits of
/// [`path_uuid`], e.g. `Comp_1a2b...`. Hyphen-free by construction.
pub fn derive_id(role: IdRole, namespace: &Uuid, logical_path: &str) -> String {
    format!(
        "{}{}",
        role.prefix(),
        path_uuid(namespace, logical_path).simple()
    )
}
