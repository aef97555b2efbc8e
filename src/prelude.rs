//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use retention_sweeper::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, SweepError};

// Sweeper
pub use crate::sweeper::clock::{Clock, FixedClock, SystemClock};
pub use crate::sweeper::cutoff::{Cutoff, compute_cutoff, cutoff_at};
pub use crate::sweeper::entry::{AgeSource, EntryKind, SweepTarget};
pub use crate::sweeper::events::{CollectingObserver, NoopObserver, SweepEvent, SweepObserver};
pub use crate::sweeper::lister::{DirectoryListing, list_children};
pub use crate::sweeper::orchestrator::{SweepOrchestrator, SweepOutcome, SweepRequest};
pub use crate::sweeper::retention::{RetentionPolicy, RetentionSweeper, SweepResult};

// Logging
pub use crate::logger::activity::ActivityLogger;
