//! Entity name checks and collision handling.

use std::path::{Path, PathBuf};

use crate::config::CollisionPolicy;
use crate::error::{Error, Result};

/// Check that a remote entity name can be used as a single path component.
///
/// Names are used verbatim; anything that would escape the current
/// directory is rejected rather than rewritten.
pub fn validate_entity_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Name cannot be empty or whitespace-only".to_string(),
        ));
    }

    if name == "." || name == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in name: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in name: '{}'",
            name
        )));
    }

    Ok(name)
}

/// Pick the path a download should be written to, or `None` to skip it.
pub fn resolve_target(dir: &Path, name: &str, policy: CollisionPolicy) -> Result<Option<PathBuf>> {
    let path = dir.join(validate_entity_name(name)?);

    let target = match policy {
        CollisionPolicy::OverwriteLocal => Some(path),
        CollisionPolicy::KeepLocal if path.exists() => None,
        CollisionPolicy::KeepLocal => Some(path),
        CollisionPolicy::KeepBoth => Some(make_unique_filename(&path)),
    };

    Ok(target)
}

/// Make a unique filename by appending `(n)` before the extension.
///
/// `data.csv` becomes `data(1).csv`, then `data(2).csv`, and so on.
pub fn make_unique_filename(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    let mut counter = 1;
    loop {
        let new_name = if ext.is_empty() {
            format!("{}({})", stem, counter)
        } else {
            format!("{}({}).{}", stem, counter, ext)
        };

        let new_path = parent.join(&new_name);
        if !new_path.exists() {
            return new_path;
        }

        counter += 1;
    }
}
