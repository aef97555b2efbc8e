//! Retention sweep: cutoff computation, single-level listing, per-kind
//! sweeps and the orchestrator that runs both kinds for one root.

pub mod clock;
pub mod cutoff;
pub mod entry;
pub mod events;
pub mod lister;
pub mod orchestrator;
pub mod retention;
