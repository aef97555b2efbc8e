#![forbid(unsafe_code)]

//! Retention sweeper: removes direct children of one directory once they are
//! older than a per-kind number of days.
//!
//! Files and folders have independent policies. Age is measured against a
//! cutoff pinned to 23:59:59 local time, so every entry touched on the same
//! calendar day qualifies on the same run.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use retention_sweeper::prelude::*;
//!
//! let config = Config::load(None)?;
//! let outcome = SweepOrchestrator::new().run(&config.request(), &mut NoopObserver)?;
//! println!("removed {} files", outcome.files_removed());
//! # Ok::<(), SweepError>(())
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use retention_sweeper::sweeper::cutoff::compute_cutoff;
//! use retention_sweeper::sweeper::clock::SystemClock;
//!
//! let cutoff = compute_cutoff(&SystemClock, 30);
//! println!("entries older than {cutoff} qualify");
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod sweeper;
