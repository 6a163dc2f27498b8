// crates/relink-core/src/result.rs
//
// Output of one restoration pass. Every input reference lands in exactly one
// of: restored_media / restored_music / relocated_files / corrupted_files /
// missing_files. Relocated entries are NOT duplicated into the restored
// lists; use `usable_media()` / `usable_music()` for "everything the editor
// can load right now".

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::asset::MediaAsset;
use crate::reference::{ReferenceKind, SavedMediaReference};

/// Caller-supplied switches for one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestoreOptions {
    /// Don't surface unresolved files for a human decision; the pass completes
    /// and they stay in `missing_files`.
    pub auto_resolve: bool,
    /// A human-resolution round is expected for leftovers.
    pub show_dialog:  bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self { auto_resolve: false, show_dialog: true }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocatedFile {
    pub original:   SavedMediaReference,
    pub new_path:   PathBuf,
    pub kind:       ReferenceKind,
    pub confidence: f64,
}

impl RelocatedFile {
    pub fn to_asset(&self) -> MediaAsset {
        MediaAsset::from_reference(&self.original, &self.new_path)
    }
}

/// File is present at the resolved path but its attributes don't match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorruptedFile {
    pub reference:  SavedMediaReference,
    pub path:       PathBuf,
    pub kind:       ReferenceKind,
    pub confidence: f64,
    pub issues:     Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestorationStats {
    pub total:     usize,
    pub restored:  usize,
    pub missing:   usize,
    pub relocated: usize,
    pub corrupted: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorationResult {
    pub restored_media:  Vec<MediaAsset>,
    pub restored_music:  Vec<MediaAsset>,
    pub missing_files:   Vec<SavedMediaReference>,
    pub relocated_files: Vec<RelocatedFile>,
    pub corrupted_files: Vec<CorruptedFile>,
    pub stats:           RestorationStats,
}

impl RestorationResult {
    /// Recompute `stats` from the lists. `total` is the number of inputs and
    /// is passed in rather than derived so a dropped entry shows up as a
    /// mismatch instead of silently shrinking the total.
    pub fn finalize_stats(&mut self, total: usize) {
        self.stats = RestorationStats {
            total,
            restored:  self.restored_media.len() + self.restored_music.len(),
            missing:   self.missing_files.len(),
            relocated: self.relocated_files.len(),
            corrupted: self.corrupted_files.len(),
        };
    }

    /// True when every input reference is accounted for exactly once.
    pub fn is_partitioned(&self) -> bool {
        let s = &self.stats;
        s.restored + s.missing + s.relocated + s.corrupted == s.total
    }

    pub fn has_unresolved(&self) -> bool {
        !self.missing_files.is_empty()
    }

    /// Restored media plus relocated media promoted at their new path.
    pub fn usable_media(&self) -> Vec<MediaAsset> {
        self.usable(ReferenceKind::Media, &self.restored_media)
    }

    /// Restored music plus relocated music promoted at their new path.
    pub fn usable_music(&self) -> Vec<MediaAsset> {
        self.usable(ReferenceKind::Music, &self.restored_music)
    }

    fn usable(&self, kind: ReferenceKind, restored: &[MediaAsset]) -> Vec<MediaAsset> {
        restored
            .iter()
            .cloned()
            .chain(
                self.relocated_files
                    .iter()
                    .filter(|r| r.kind == kind)
                    .map(RelocatedFile::to_asset),
            )
            .collect()
    }
}
