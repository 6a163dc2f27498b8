// crates/relink-media/src/lib.rs
//
// The restoration runtime. Talks to the filesystem through `FileProbe` only:
// swap the probe and nothing else changes.
//
// Layering, leaves first:
//   probe      async exists / stat / name search (the OS boundary)
//   validate   attribute comparison → confidence + issues
//   search     bounded-depth candidate walk
//   restore    the orchestrator: one pass over a whole project
//   controller phase/progress state machine the UI drives
//   worker     controller on a background thread, events over a channel

pub mod controller;
pub mod probe;
pub mod restore;
pub mod search;
pub mod validate;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the main public API so callers import from one place.
pub use controller::{RestorationController, RestoreOutcome};
pub use probe::{FileProbe, FileStats, LocalProbe};
pub use restore::{RestoreProgress, Restorer};
pub use validate::ValidationResult;
pub use worker::{RestoreEvent, RestoreWorker};
pub use relink_core::generate_report;
