//! Progress events emitted while sweeping, and the observer that receives them.

use crate::sweeper::cutoff::Cutoff;
use crate::sweeper::entry::{EntryKind, SweepTarget};
use crate::sweeper::retention::SweepResult;

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepEvent {
    /// A sweep of one kind is starting.
    SweepStarted { kind: EntryKind, cutoff: Cutoff },
    /// The policy for this kind is disabled.
    SweepSkipped { kind: EntryKind },
    /// About to delete an entry.
    Removing(SweepTarget),
    /// Dry-run: the entry qualifies but is left in place.
    WouldRemove(SweepTarget),
    /// A sweep of one kind completed.
    SweepFinished(SweepResult),
    /// A sweep of one kind aborted.
    SweepFailed { kind: EntryKind, message: String },
}

/// Receives [`SweepEvent`]s in the order they happen.
pub trait SweepObserver {
    fn on_event(&mut self, event: &SweepEvent);
}

impl<O: SweepObserver + ?Sized> SweepObserver for &mut O {
    fn on_event(&mut self, event: &SweepEvent) {
        (**self).on_event(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {
    fn on_event(&mut self, _event: &SweepEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingObserver {
    pub events: Vec<SweepEvent>,
}

impl CollectingObserver {
    /// Targets reported as removed or would-remove, in order.
    #[must_use]
    pub fn reported_targets(&self) -> Vec<&SweepTarget> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SweepEvent::Removing(t) | SweepEvent::WouldRemove(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

impl SweepObserver for CollectingObserver {
    fn on_event(&mut self, event: &SweepEvent) {
        self.events.push(event.clone());
    }
}
