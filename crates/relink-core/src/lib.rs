// crates/relink-core/src/lib.rs
//
// Pure restoration data: nothing async and no runtime handles.
// Everything here is serializable and shared by relink-media and relink-cli.
//
// The only module that touches the disk is `paths` (canonicalize, for the
// save-time relative path) and `project` / `config` (plain file reads).

pub mod asset;
pub mod config;
pub mod error;
pub mod paths;
pub mod project;
pub mod reference;
pub mod report;
pub mod resolution;
pub mod result;
pub mod state;

pub use asset::MediaAsset;
pub use config::RestoreConfig;
pub use error::{RestoreError, Result};
pub use reference::{
    MediaMetadata, MusicMetadata, ReferenceKind, ReferenceStatus, SavedMediaReference,
    SavedMusicReference,
};
pub use report::generate_report;
pub use resolution::{ResolutionAction, ResolutionDecision, ResolutionOutcome};
pub use result::{CorruptedFile, RelocatedFile, RestorationResult, RestorationStats, RestoreOptions};
pub use state::{RestorationPhase, RestorationState};
