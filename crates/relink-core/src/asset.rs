// crates/relink-core/src/asset.rs
//
// The in-memory media shape the rest of the editor consumes (library panel,
// timeline, playback). A restored reference is promoted back into one of
// these; a saved reference is captured from one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reference::{MusicMetadata, SavedMediaReference};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id:         String,
    pub name:       String,
    pub path:       PathBuf,
    pub is_video:   bool,
    pub is_audio:   bool,
    pub is_image:   bool,
    pub size:       u64,
    #[serde(default)]
    pub duration:   Option<f64>,
    #[serde(default)]
    pub start_time: Option<f64>,
    /// Raw prober output, never interpreted here.
    #[serde(default)]
    pub probe_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_metadata: Option<MusicMetadata>,
}

impl MediaAsset {
    /// Promote a saved reference to a live asset located at `path`.
    ///
    /// `path` is where the file actually is now: the recorded path for an
    /// available file, the replacement for a relocated or user-found one.
    pub fn from_reference(reference: &SavedMediaReference, path: &Path) -> Self {
        Self {
            id:             reference.id.clone(),
            name:           reference.name.clone(),
            path:           path.to_path_buf(),
            is_video:       reference.is_video,
            is_audio:       reference.is_audio,
            is_image:       reference.is_image,
            size:           reference.size,
            duration:       reference.metadata.duration(),
            start_time:     reference.metadata.start_time(),
            probe_data:     reference.metadata.probe_data().cloned(),
            music_metadata: reference.music_metadata.clone(),
        }
    }
}
