//! Path validation
//!
//! Handles path validation and security checks.

use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Returns true if `name` is a plain file name confined to the storage root.
///
/// The name must be a single normal path component equal to its own base
/// name: no separators, no `.` or `..`, not empty.
pub fn is_safe_relative_path(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(base)), None) => base == name,
        _ => false,
    }
}

/// Strips any client-side directory part from an uploaded file name.
///
/// Both `/` and `\` count as separators. Returns `None` when the last
/// segment is not a safe file name (empty, `.` or `..`).
pub fn base_file_name(name: &str) -> Option<&str> {
    name.rsplit(['/', '\\'])
        .next()
        .filter(|base| is_safe_relative_path(base))
}

/// Joins `name` onto `root` after checking it cannot escape the root.
pub fn resolve_in_root(root: &Path, name: &str) -> Result<PathBuf, StorageError> {
    if !is_safe_relative_path(name) {
        return Err(StorageError::InvalidFileName(name.to_string()));
    }
    Ok(root.join(name))
}
