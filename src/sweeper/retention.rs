//! One retention sweep: every direct child of one kind older than the cutoff
//! is removed (or reported, in dry-run mode).
//!
//! Pipeline per candidate:
//! 1. Re-check the entry still has the expected kind (skip if not, or gone)
//! 2. Read its age timestamp
//! 3. Compare strictly against the cutoff
//! 4. Delete (`remove_file` / `remove_dir_all`) or report as would-remove
//!
//! The first failing filesystem call aborts the sweep. Entries handled before
//! the failure stay removed. Listing, re-check and deletion are separate
//! calls, so another process can still change an entry in between.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SweepError};
use crate::sweeper::clock::Clock;
use crate::sweeper::cutoff::compute_cutoff;
use crate::sweeper::entry::{AgeSource, EntryKind, SweepTarget};
use crate::sweeper::events::{SweepEvent, SweepObserver};
use crate::sweeper::lister::list_children;

/// Enable toggle and age threshold for one kind.
///
/// Thresholds are validated as non-negative by [`crate::core::config::Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub enabled: bool,
    pub max_age_days: i64,
}

impl RetentionPolicy {
    #[must_use]
    pub const fn new(enabled: bool, max_age_days: i64) -> Self {
        Self {
            enabled,
            max_age_days,
        }
    }

    /// Files: enabled, 30 days.
    #[must_use]
    pub const fn files_default() -> Self {
        Self::new(true, 30)
    }

    /// Folders: disabled, 10 days.
    #[must_use]
    pub const fn folders_default() -> Self {
        Self::new(false, 10)
    }
}

/// What one sweep removed (or would have removed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepResult {
    pub kind: EntryKind,
    pub dry_run: bool,
    pub removed_count: usize,
    pub removed: Vec<PathBuf>,
}

impl SweepResult {
    fn new(kind: EntryKind, dry_run: bool) -> Self {
        Self {
            kind,
            dry_run,
            removed_count: 0,
            removed: Vec::new(),
        }
    }

    fn record(&mut self, path: PathBuf) {
        self.removed_count += 1;
        self.removed.push(path);
    }
}

/// Applies one kind's age threshold to the direct children of a directory.
#[derive(Debug, Clone)]
pub struct RetentionSweeper<C: Clock> {
    clock: C,
    age_source: AgeSource,
}

impl<C: Clock> RetentionSweeper<C> {
    pub const fn new(clock: C, age_source: AgeSource) -> Self {
        Self { clock, age_source }
    }

    /// Sweep `root` for entries of `kind` older than `max_age_days`.
    ///
    /// In dry-run mode nothing is touched but qualifying entries are still
    /// counted.
    pub fn sweep(
        &self,
        root: &Path,
        kind: EntryKind,
        max_age_days: i64,
        dry_run: bool,
        observer: &mut dyn SweepObserver,
    ) -> Result<SweepResult> {
        let cutoff = compute_cutoff(&self.clock, max_age_days);
        observer.on_event(&SweepEvent::SweepStarted { kind, cutoff });

        let listing = list_children(root)?;
        let mut result = SweepResult::new(kind, dry_run);

        for name in listing.names(kind) {
            let path = root.join(name);
            let Some(meta) = current_metadata(&path, kind)? else {
                continue;
            };
            let timestamp = self
                .age_source
                .timestamp(&meta)
                .map_err(|e| SweepError::io(&path, e))?;
            if !cutoff.is_expired(timestamp) {
                continue;
            }

            let target = SweepTarget { path, kind };
            if dry_run {
                observer.on_event(&SweepEvent::WouldRemove(target.clone()));
            } else {
                observer.on_event(&SweepEvent::Removing(target.clone()));
                remove_entry(&target)?;
            }
            result.record(target.path);
        }

        observer.on_event(&SweepEvent::SweepFinished(result.clone()));
        Ok(result)
    }
}

/// Metadata to age `path` by, if it still exists with the expected kind.
///
/// A link to a file is aged by its target and removed as a link. Links to
/// directories are never swept, and dangling links are skipped.
fn current_metadata(path: &Path, kind: EntryKind) -> Result<Option<fs::Metadata>> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SweepError::io(path, e)),
    };
    if !meta.file_type().is_symlink() {
        return Ok(kind.matches(meta.file_type()).then_some(meta));
    }
    match (kind, fs::metadata(path)) {
        (EntryKind::File, Ok(target)) if target.is_file() => Ok(Some(target)),
        _ => Ok(None),
    }
}

fn remove_entry(target: &SweepTarget) -> Result<()> {
    let removed = match target.kind {
        EntryKind::File => fs::remove_file(&target.path),
        EntryKind::Directory => fs::remove_dir_all(&target.path),
    };
    removed.map_err(|e| SweepError::io(&target.path, e))
}
