//! Path expansion and directory management.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use regex::{Captures, Regex};

use crate::error::Result;

/// Expand environment variables and a leading `~` in a path.
///
/// `$VAR` and `${VAR}` are replaced from the process environment; unknown
/// variables are left as written. A leading `~` or `~/` becomes the
/// current user's home directory.
pub fn expand_path(raw: &str) -> PathBuf {
    expand_path_with(raw, |key| std::env::var(key).ok(), home_dir())
}

/// Expand a path using the given variable lookup and home directory.
pub fn expand_path_with<F>(raw: &str, lookup: F, home: Option<PathBuf>) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let var_pattern = Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .unwrap();

    let expanded = var_pattern.replace_all(raw, |caps: &Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        lookup(name).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned();

    if let Some(home) = home {
        if expanded == "~" {
            return home;
        }
        if let Some(rest) = expanded
            .strip_prefix("~/")
            .or_else(|| expanded.strip_prefix("~\\"))
        {
            return home.join(rest);
        }
    }

    PathBuf::from(expanded)
}

fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Local path for a remote entity inside `dir`.
pub fn local_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}

/// Ensure a directory exists, creating it and its parents if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
