//! Sweep-root path handling.

use std::env;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against the current directory and tidy it.
///
/// Repeated separators, interior `.` components and trailing separators are
/// dropped. Symlinks and `..` are left alone: resolving them could point the
/// sweep at a different directory than the one the operator named.
pub fn resolve_root(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    tidy(&absolute)
}

/// Drop trailing separators and `.` components without touching the filesystem.
pub fn tidy(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
