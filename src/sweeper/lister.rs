//! Single-level directory listing split into files and subdirectories.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::core::errors::{Result, SweepError};
use crate::sweeper::entry::EntryKind;

/// Names of the direct children of one directory, by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub files: Vec<OsString>,
    pub directories: Vec<OsString>,
}

impl DirectoryListing {
    /// The name list for one kind.
    #[must_use]
    pub fn names(&self, kind: EntryKind) -> &[OsString] {
        match kind {
            EntryKind::File => &self.files,
            EntryKind::Directory => &self.directories,
        }
    }
}

/// Fail with [`SweepError::NotADirectory`] unless `path` is an existing directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(SweepError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SweepError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(SweepError::io(path, e)),
    }
}

/// Enumerate the direct children of `path` without descending.
///
/// Symlinks are listed under the kind of their target; dangling links and
/// entries that are neither files nor directories are left out. Both lists
/// are sorted by name.
pub fn list_children(path: &Path) -> Result<DirectoryListing> {
    ensure_directory(path)?;

    let mut listing = DirectoryListing::default();
    for entry in fs::read_dir(path).map_err(|e| SweepError::io(path, e))? {
        let entry = entry.map_err(|e| SweepError::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| SweepError::io(entry.path(), e))?;
        match EntryKind::classify_path(&entry.path(), file_type) {
            Some(EntryKind::File) => listing.files.push(entry.file_name()),
            Some(EntryKind::Directory) => listing.directories.push(entry.file_name()),
            None => {}
        }
    }

    listing.files.sort();
    listing.directories.sort();
    Ok(listing)
}
