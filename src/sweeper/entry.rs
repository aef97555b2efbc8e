//! Entry classification and the timestamp an entry's age is measured by.

use std::fmt;
use std::fs::{self, FileType};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::core::errors::SweepError;

/// Which kind of immediate child a sweep targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Singular label used in per-entry report lines ("file", "directory").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }

    /// Plural label used in per-kind totals ("files", "folders").
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::File => "files",
            Self::Directory => "folders",
        }
    }

    /// Whether a file type belongs to this kind. A symlink's own type matches neither.
    #[must_use]
    pub fn matches(self, file_type: FileType) -> bool {
        match self {
            Self::File => file_type.is_file(),
            Self::Directory => file_type.is_dir(),
        }
    }

    /// Classify a file type, or `None` for symlinks, sockets, FIFOs, devices.
    #[must_use]
    pub fn classify(file_type: FileType) -> Option<Self> {
        if Self::Directory.matches(file_type) {
            Some(Self::Directory)
        } else if Self::File.matches(file_type) {
            Some(Self::File)
        } else {
            None
        }
    }

    /// Classify the entry at `path`, taking a symlink's kind from its target.
    ///
    /// Dangling links, and links whose target cannot be read, yield `None`.
    #[must_use]
    pub fn classify_path(path: &Path, file_type: FileType) -> Option<Self> {
        if file_type.is_symlink() {
            fs::metadata(path)
                .ok()
                .and_then(|target| Self::classify(target.file_type()))
        } else {
            Self::classify(file_type)
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One immediate child discovered under the sweep root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepTarget {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Timestamp used as an entry's age reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeSource {
    /// Status-change time (`ctime` on Unix; creation time elsewhere).
    #[default]
    Changed,
    /// Last content modification time.
    Modified,
}

impl AgeSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::Modified => "modified",
        }
    }

    /// Read this timestamp from entry metadata.
    pub fn timestamp(self, meta: &fs::Metadata) -> io::Result<SystemTime> {
        match self {
            Self::Changed => status_changed(meta),
            Self::Modified => meta.modified(),
        }
    }
}

impl fmt::Display for AgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeSource {
    type Err = SweepError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "changed" | "ctime" => Ok(Self::Changed),
            "modified" | "mtime" => Ok(Self::Modified),
            other => Err(SweepError::ConfigParse {
                context: "age_source",
                details: format!("expected `changed` or `modified`, got {other:?}"),
            }),
        }
    }
}

#[cfg(unix)]
fn status_changed(meta: &fs::Metadata) -> io::Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    Ok(system_time_from_unix(meta.ctime(), meta.ctime_nsec()))
}

#[cfg(not(unix))]
fn status_changed(meta: &fs::Metadata) -> io::Result<SystemTime> {
    meta.created().or_else(|_| meta.modified())
}

#[cfg(unix)]
fn system_time_from_unix(secs: i64, nanos: i64) -> SystemTime {
    use std::time::{Duration, UNIX_EPOCH};

    let nanos = u32::try_from(nanos.clamp(0, 999_999_999)).unwrap_or(0);
    let whole = Duration::from_secs(secs.unsigned_abs());
    let base = if secs >= 0 {
        UNIX_EPOCH + whole
    } else {
        UNIX_EPOCH - whole
    };
    base + Duration::from_nanos(u64::from(nanos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn labels_match_report_wording() {
        assert_eq!(EntryKind::File.label(), "file");
        assert_eq!(EntryKind::Directory.label(), "directory");
        assert_eq!(EntryKind::File.plural(), "files");
        assert_eq!(EntryKind::Directory.plural(), "folders");
    }

    #[test]
    fn classify_uses_the_entry_type() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("d");
        let file = tmp.path().join("f");
        fs::create_dir(&dir).unwrap();
        fs::write(&file, "x").unwrap();

        let dir_type = fs::symlink_metadata(&dir).unwrap().file_type();
        let file_type = fs::symlink_metadata(&file).unwrap().file_type();
        assert_eq!(EntryKind::classify(dir_type), Some(EntryKind::Directory));
        assert_eq!(EntryKind::classify(file_type), Some(EntryKind::File));
        assert_eq!(EntryKind::classify_path(&file, file_type), Some(EntryKind::File));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_take_the_kind_of_their_target() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("d");
        let file = tmp.path().join("f");
        fs::create_dir(&dir).unwrap();
        fs::write(&file, "x").unwrap();

        let to_dir = tmp.path().join("link-to-dir");
        let to_file = tmp.path().join("link-to-file");
        let dangling = tmp.path().join("dangling");
        std::os::unix::fs::symlink(&dir, &to_dir).unwrap();
        std::os::unix::fs::symlink(&file, &to_file).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), &dangling).unwrap();

        let kind_of = |path: &Path| {
            let own = fs::symlink_metadata(path).unwrap().file_type();
            assert_eq!(EntryKind::classify(own), None);
            EntryKind::classify_path(path, own)
        };
        assert_eq!(kind_of(&to_dir), Some(EntryKind::Directory));
        assert_eq!(kind_of(&to_file), Some(EntryKind::File));
        assert_eq!(kind_of(&dangling), None);
    }

    #[test]
    fn age_source_parses_case_insensitively() {
        assert_eq!("Changed".parse::<AgeSource>().unwrap(), AgeSource::Changed);
        assert_eq!("MTIME".parse::<AgeSource>().unwrap(), AgeSource::Modified);
        let err = "birth".parse::<AgeSource>().unwrap_err();
        assert_eq!(err.code(), "SWP-1003");
    }

    #[test]
    fn modified_source_reads_backdated_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("old.log");
        fs::write(&file, "x").unwrap();
        let past = SystemTime::now() - Duration::from_secs(40 * 86_400);
        filetime::set_file_mtime(&file, filetime::FileTime::from_system_time(past)).unwrap();

        let meta = fs::symlink_metadata(&file).unwrap();
        let ts = AgeSource::Modified.timestamp(&meta).unwrap();
        let drift = ts
            .duration_since(past)
            .unwrap_or_else(|e| e.duration());
        assert!(drift < Duration::from_secs(1));
    }

    #[test]
    fn changed_source_is_recent_for_new_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("new.log");
        fs::write(&file, "x").unwrap();

        let meta = fs::symlink_metadata(&file).unwrap();
        let ts = AgeSource::Changed.timestamp(&meta).unwrap();
        let age = SystemTime::now()
            .duration_since(ts)
            .unwrap_or(Duration::ZERO);
        assert!(age < Duration::from_secs(3600), "ctime too old: {age:?}");
    }

    #[cfg(unix)]
    #[test]
    fn unix_time_conversion_handles_negative_seconds() {
        assert_eq!(
            system_time_from_unix(10, 500),
            UNIX_EPOCH + Duration::new(10, 500)
        );
        assert_eq!(
            system_time_from_unix(-10, 0),
            UNIX_EPOCH - Duration::from_secs(10)
        );
    }
}
