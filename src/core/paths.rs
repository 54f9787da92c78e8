//! Path normalization utilities
//!
//! Ensures all paths are normalized to use '/' as separator and are relative to the base folder.

use std::path::{Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the base folder
pub fn make_relative(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(normalize_path)
}

/// Resolve a possibly relative path against the base folder
pub fn resolve_under(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Default location of editor workspace settings under a base folder
pub fn workspace_settings_path(base: &Path) -> PathBuf {
    base.join(".vscode").join("settings.json")
}
