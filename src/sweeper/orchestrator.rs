//! Runs the files sweep and the folders sweep for one root.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::errors::Result;
use crate::sweeper::clock::{Clock, SystemClock};
use crate::sweeper::entry::{AgeSource, EntryKind};
use crate::sweeper::events::{SweepEvent, SweepObserver};
use crate::sweeper::lister::ensure_directory;
use crate::sweeper::retention::{RetentionPolicy, RetentionSweeper, SweepResult};

/// Fully resolved input for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepRequest {
    pub root: PathBuf,
    pub files: RetentionPolicy,
    pub folders: RetentionPolicy,
    pub dry_run: bool,
    pub age_source: AgeSource,
}

impl SweepRequest {
    #[must_use]
    pub const fn policy(&self, kind: EntryKind) -> RetentionPolicy {
        match kind {
            EntryKind::File => self.files,
            EntryKind::Directory => self.folders,
        }
    }
}

/// Per-kind results of one run; `None` means the kind was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepOutcome {
    pub files: Option<SweepResult>,
    pub folders: Option<SweepResult>,
}

impl SweepOutcome {
    #[must_use]
    pub fn result(&self, kind: EntryKind) -> Option<&SweepResult> {
        match kind {
            EntryKind::File => self.files.as_ref(),
            EntryKind::Directory => self.folders.as_ref(),
        }
    }

    #[must_use]
    pub fn files_removed(&self) -> usize {
        self.files.as_ref().map_or(0, |r| r.removed_count)
    }

    #[must_use]
    pub fn folders_removed(&self) -> usize {
        self.folders.as_ref().map_or(0, |r| r.removed_count)
    }

    /// `(files_removed, folders_removed)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        (self.files_removed(), self.folders_removed())
    }

    fn slot_mut(&mut self, kind: EntryKind) -> &mut Option<SweepResult> {
        match kind {
            EntryKind::File => &mut self.files,
            EntryKind::Directory => &mut self.folders,
        }
    }
}

/// Validates the root once, then applies each enabled policy in turn.
#[derive(Debug, Clone, Default)]
pub struct SweepOrchestrator<C: Clock = SystemClock> {
    clock: C,
}

impl SweepOrchestrator<SystemClock> {
    #[must_use]
    pub const fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> SweepOrchestrator<C> {
    pub const fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Run both sweeps for `request.root`.
    ///
    /// A root that is not a directory fails before either sweep starts. A
    /// failing files sweep does not prevent the folders sweep from being
    /// attempted; the first error is returned once both have run.
    pub fn run(
        &self,
        request: &SweepRequest,
        observer: &mut dyn SweepObserver,
    ) -> Result<SweepOutcome> {
        ensure_directory(&request.root)?;

        let sweeper = RetentionSweeper::new(&self.clock, request.age_source);
        let mut outcome = SweepOutcome::default();
        let mut first_error = None;

        for kind in [EntryKind::File, EntryKind::Directory] {
            let policy = request.policy(kind);
            if !policy.enabled {
                observer.on_event(&SweepEvent::SweepSkipped { kind });
                continue;
            }

            match sweeper.sweep(
                &request.root,
                kind,
                policy.max_age_days,
                request.dry_run,
                observer,
            ) {
                Ok(result) => *outcome.slot_mut(kind) = Some(result),
                Err(error) => {
                    observer.on_event(&SweepEvent::SweepFailed {
                        kind,
                        message: error.to_string(),
                    });
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::SweepError;
    use crate::sweeper::events::{CollectingObserver, NoopObserver};
    use filetime::{FileTime, set_file_mtime};
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn backdate(path: &Path, days: u64) {
        let when = SystemTime::now() - Duration::from_secs(days * 86_400);
        set_file_mtime(path, FileTime::from_system_time(when)).unwrap();
    }

    /// a.txt (40d), b.txt (5d), old_dir/ (15d, one file inside).
    fn scenario() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.txt");
        let b = tmp.path().join("b.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        backdate(&a, 40);
        backdate(&b, 5);
        let old_dir = tmp.path().join("old_dir");
        fs::create_dir(&old_dir).unwrap();
        fs::write(old_dir.join("inside.txt"), "x").unwrap();
        backdate(&old_dir, 15);
        tmp
    }

    fn request(root: &Path, dry_run: bool) -> SweepRequest {
        SweepRequest {
            root: root.to_path_buf(),
            files: RetentionPolicy::new(true, 30),
            folders: RetentionPolicy::new(true, 10),
            dry_run,
            age_source: AgeSource::Modified,
        }
    }

    fn snapshot(root: &Path) -> Vec<(PathBuf, bool, SystemTime)> {
        let mut entries: Vec<_> = fs::read_dir(root)
            .unwrap()
            .map(|e| {
                let e = e.unwrap();
                let meta = e.metadata().unwrap();
                (e.path(), meta.is_dir(), meta.modified().unwrap())
            })
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn removes_old_files_and_folders() {
        let tmp = scenario();
        let outcome = SweepOrchestrator::new()
            .run(&request(tmp.path(), false), &mut NoopObserver)
            .unwrap();

        assert_eq!(outcome.counts(), (1, 1));
        assert!(!tmp.path().join("a.txt").exists());
        assert!(tmp.path().join("b.txt").exists());
        assert!(!tmp.path().join("old_dir").exists());
    }

    #[test]
    fn dry_run_reports_same_counts_and_changes_nothing() {
        let tmp = scenario();
        let before = snapshot(tmp.path());

        let outcome = SweepOrchestrator::new()
            .run(&request(tmp.path(), true), &mut NoopObserver)
            .unwrap();

        assert_eq!(outcome.counts(), (1, 1));
        assert_eq!(snapshot(tmp.path()), before);
        assert!(tmp.path().join("old_dir").join("inside.txt").exists());
    }

    #[test]
    fn disabled_files_policy_leaves_files_alone() {
        let tmp = scenario();
        let mut req = request(tmp.path(), false);
        req.files = RetentionPolicy::new(false, 0);

        let mut observer = CollectingObserver::default();
        let outcome = SweepOrchestrator::new().run(&req, &mut observer).unwrap();

        assert!(outcome.files.is_none());
        assert_eq!(outcome.counts(), (0, 1));
        assert!(tmp.path().join("a.txt").exists());
        assert!(!tmp.path().join("old_dir").exists());
        assert_eq!(
            observer.events.first(),
            Some(&SweepEvent::SweepSkipped {
                kind: EntryKind::File
            })
        );
    }

    #[test]
    fn default_policies_skip_folders() {
        let tmp = scenario();
        let mut req = request(tmp.path(), false);
        req.files = RetentionPolicy::files_default();
        req.folders = RetentionPolicy::folders_default();

        let outcome = SweepOrchestrator::new().run(&req, &mut NoopObserver).unwrap();
        assert_eq!(outcome.counts(), (1, 0));
        assert!(outcome.result(EntryKind::Directory).is_none());
        assert!(tmp.path().join("old_dir").exists());
    }

    #[test]
    fn invalid_root_runs_neither_sweep() {
        let tmp = TempDir::new().unwrap();
        let not_dir = tmp.path().join("file.txt");
        fs::write(&not_dir, "x").unwrap();

        let mut observer = CollectingObserver::default();
        let err = SweepOrchestrator::new()
            .run(&request(&not_dir, false), &mut observer)
            .unwrap_err();

        assert!(matches!(err, SweepError::NotADirectory { .. }));
        assert!(observer.events.is_empty());
    }

    /// Deletes the root as soon as the files sweep announces itself.
    struct RootVanisher {
        root: PathBuf,
        events: Vec<SweepEvent>,
    }

    impl SweepObserver for RootVanisher {
        fn on_event(&mut self, event: &SweepEvent) {
            if matches!(
                event,
                SweepEvent::SweepStarted {
                    kind: EntryKind::File,
                    ..
                }
            ) {
                fs::remove_dir_all(&self.root).unwrap();
            }
            self.events.push(event.clone());
        }
    }

    #[test]
    fn folders_sweep_is_attempted_after_files_sweep_fails() {
        let tmp = scenario();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();

        let mut observer = RootVanisher {
            root: root.clone(),
            events: Vec::new(),
        };
        let err = SweepOrchestrator::new()
            .run(&request(&root, false), &mut observer)
            .unwrap_err();

        assert!(matches!(err, SweepError::NotADirectory { .. }));
        let failed: Vec<EntryKind> = observer
            .events
            .iter()
            .filter_map(|e| match e {
                SweepEvent::SweepFailed { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(failed, vec![EntryKind::File, EntryKind::Directory]);
    }
}
