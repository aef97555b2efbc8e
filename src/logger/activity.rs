//! Maps sweep events onto JSONL activity-log entries.

use std::path::Path;

use crate::core::errors::SweepError;
use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};
use crate::sweeper::events::{SweepEvent, SweepObserver};
use crate::sweeper::orchestrator::{SweepOutcome, SweepRequest};

/// Activity log for one run. Without a destination every call is a no-op.
pub struct ActivityLogger {
    writer: Option<JsonlWriter>,
}

impl ActivityLogger {
    #[must_use]
    pub fn open(path: Option<&Path>) -> Self {
        Self {
            writer: path.map(JsonlWriter::open),
        }
    }

    pub fn run_started(&mut self, request: &SweepRequest) {
        let mut entry = LogEntry::new(EventType::RunStart, Severity::Info);
        entry.path = Some(request.root.display().to_string());
        entry.dry_run = Some(request.dry_run);
        self.write(&entry);
    }

    pub fn run_completed(&mut self, request: &SweepRequest, outcome: &SweepOutcome) {
        let (files, folders) = outcome.counts();
        let mut entry = LogEntry::new(EventType::RunComplete, Severity::Info);
        entry.path = Some(request.root.display().to_string());
        entry.count = Some(files + folders);
        entry.dry_run = Some(request.dry_run);
        self.write(&entry);
        self.flush();
    }

    pub fn run_failed(&mut self, error: &SweepError) {
        let mut entry = LogEntry::new(EventType::Error, Severity::Critical);
        entry.error_code = Some(error.code().to_string());
        entry.error_message = Some(error.to_string());
        self.write(&entry);
        self.flush();
    }

    pub fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush();
        }
    }

    fn write(&mut self, entry: &LogEntry) {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_entry(entry);
        }
    }
}

impl SweepObserver for ActivityLogger {
    fn on_event(&mut self, event: &SweepEvent) {
        if self.writer.is_none() {
            return;
        }
        self.write(&entry_for(event));
    }
}

fn entry_for(event: &SweepEvent) -> LogEntry {
    match event {
        SweepEvent::SweepStarted { kind, cutoff } => {
            let mut entry = LogEntry::new(EventType::SweepStart, Severity::Info);
            entry.kind = Some(kind.label().to_string());
            entry.max_age_days = Some(cutoff.days());
            entry.cutoff = Some(cutoff.to_string());
            entry
        }
        SweepEvent::SweepSkipped { kind } => {
            let mut entry = LogEntry::new(EventType::SweepSkipped, Severity::Info);
            entry.kind = Some(kind.label().to_string());
            entry
        }
        SweepEvent::Removing(target) => {
            let mut entry = LogEntry::new(EventType::EntryRemoved, Severity::Info);
            entry.kind = Some(target.kind.label().to_string());
            entry.path = Some(target.path.display().to_string());
            entry.dry_run = Some(false);
            entry
        }
        SweepEvent::WouldRemove(target) => {
            let mut entry = LogEntry::new(EventType::EntryWouldRemove, Severity::Info);
            entry.kind = Some(target.kind.label().to_string());
            entry.path = Some(target.path.display().to_string());
            entry.dry_run = Some(true);
            entry
        }
        SweepEvent::SweepFinished(result) => {
            let mut entry = LogEntry::new(EventType::SweepComplete, Severity::Info);
            entry.kind = Some(result.kind.label().to_string());
            entry.count = Some(result.removed_count);
            entry.dry_run = Some(result.dry_run);
            entry
        }
        SweepEvent::SweepFailed { kind, message } => {
            let mut entry = LogEntry::new(EventType::SweepFailed, Severity::Warning);
            entry.kind = Some(kind.label().to_string());
            entry.error_message = Some(message.clone());
            entry
        }
    }
}
