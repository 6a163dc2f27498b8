// crates/relink-core/src/reference.rs
//
// The persisted record of one external asset, exactly as written into the
// project file. Field names are camelCase on disk; never rename a field
// without a serde alias, old projects must keep loading.
//
// Music references share the media shape; the only difference is the optional
// `musicMetadata` block extracted once at save time.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::asset::MediaAsset;
use crate::paths;

/// Namespace for deterministic reference ids. Changing it re-keys every
/// project ever saved, so don't.
const REFERENCE_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_93d7_4b1a_8c55_0e7d_3b9a_f214);

/// Classification written by the orchestrator. Never set by users directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceStatus {
    #[default]
    Unknown,
    Available,
    Missing,
    Relocated,
    Corrupted,
}

/// Which list of the project a reference came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Media,
    Music,
}

/// Opaque prober payload (duration, start time, codec probe data, ...).
///
/// Stored as an insertion-ordered JSON object and copied through untouched.
/// The accessors below only *read* the handful of keys the in-memory asset
/// shape needs; unknown keys survive a load/save cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaMetadata(pub Map<String, Value>);

impl MediaMetadata {
    pub fn duration(&self) -> Option<f64> {
        self.0.get("duration").and_then(Value::as_f64)
    }

    pub fn start_time(&self) -> Option<f64> {
        self.0.get("startTime").and_then(Value::as_f64)
    }

    pub fn probe_data(&self) -> Option<&Value> {
        self.0.get("probeData")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Tag data read from an audio file when it was added to the project.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album:  Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title:  Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year:   Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track:  Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre:  Option<String>,
}

/// One external asset as stored in a project file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMediaReference {
    pub id:            String,
    /// Absolute path at save time.
    pub original_path: PathBuf,
    /// POSIX path relative to the project file's directory. Only present when
    /// the asset lived under the project tree at save time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    pub name:          String,
    pub size:          u64,
    /// Milliseconds since the Unix epoch.
    pub last_modified: i64,
    #[serde(default)]
    pub is_video:      bool,
    #[serde(default)]
    pub is_audio:      bool,
    #[serde(default)]
    pub is_image:      bool,
    #[serde(default, skip_serializing_if = "MediaMetadata::is_empty")]
    pub metadata:      MediaMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_metadata: Option<MusicMetadata>,
    #[serde(default)]
    pub status:        ReferenceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked:  Option<DateTime<Utc>>,
}

/// Music references are stored in their own project list but share the shape.
pub type SavedMusicReference = SavedMediaReference;

impl SavedMediaReference {
    /// Build the saved record for an in-memory asset at project-save time.
    ///
    /// `last_modified` comes from the caller because the asset shape doesn't
    /// carry it. The relative path is only recorded when the asset sits under
    /// the project directory.
    pub fn capture(asset: &MediaAsset, last_modified: i64, project_file: &Path) -> Self {
        let mut metadata = Map::new();
        if let Some(d) = asset.duration {
            metadata.insert("duration".into(), Value::from(d));
        }
        if let Some(t) = asset.start_time {
            metadata.insert("startTime".into(), Value::from(t));
        }
        if let Some(p) = &asset.probe_data {
            metadata.insert("probeData".into(), p.clone());
        }

        Self {
            id:             derive_reference_id(&asset.path, asset.size, last_modified),
            original_path:  asset.path.clone(),
            relative_path:  paths::to_relative(&asset.path, project_file),
            name:           asset.name.clone(),
            size:           asset.size,
            last_modified,
            is_video:       asset.is_video,
            is_audio:       asset.is_audio,
            is_image:       asset.is_image,
            metadata:       MediaMetadata(metadata),
            music_metadata: asset.music_metadata.clone(),
            status:         ReferenceStatus::Unknown,
            last_checked:   None,
        }
    }

    /// Base name of the recorded path, falling back to `name` when the path
    /// has no final component.
    pub fn file_name(&self) -> String {
        self.original_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Copy of this reference stamped with a classification.
    pub fn classified(&self, status: ReferenceStatus, at: DateTime<Utc>) -> Self {
        Self {
            status,
            last_checked: Some(at),
            ..self.clone()
        }
    }
}

/// Stable id from path + size + mtime so the same file gets the same id across
/// sessions. Paths that aren't valid UTF-8 can't be hashed reproducibly across
/// platforms; those get a random id instead.
pub fn derive_reference_id(path: &Path, size: u64, last_modified: i64) -> String {
    match path.to_str() {
        Some(p) => {
            let key = format!("{p}|{size}|{last_modified}");
            Uuid::new_v5(&REFERENCE_NAMESPACE, key.as_bytes()).to_string()
        }
        None => {
            log::debug!("[reference] non-UTF-8 path, random id for {}", path.display());
            Uuid::new_v4().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SavedMediaReference {
        serde_json::from_value(json!({
            "id": "abc",
            "originalPath": "/media/clip.mp4",
            "name": "clip.mp4",
            "size": 1024,
            "lastModified": 1_700_000_000_000_i64,
            "isVideo": true,
            "metadata": { "duration": 12.5, "zeta": 1, "alpha": 2, "startTime": 0.0 }
        }))
        .unwrap()
    }

    #[test]
    fn derived_id_is_deterministic() {
        let p = Path::new("/media/clip.mp4");
        assert_eq!(derive_reference_id(p, 10, 5), derive_reference_id(p, 10, 5));
        assert_ne!(derive_reference_id(p, 10, 5), derive_reference_id(p, 11, 5));
        assert_ne!(derive_reference_id(p, 10, 5), derive_reference_id(p, 10, 6));
    }

    #[test]
    fn missing_optional_fields_default() {
        let r = sample();
        assert_eq!(r.status, ReferenceStatus::Unknown);
        assert!(r.relative_path.is_none());
        assert!(!r.is_audio);
        assert!(r.music_metadata.is_none());
        assert_eq!(r.metadata.duration(), Some(12.5));
    }

    #[test]
    fn metadata_key_order_survives_round_trip() {
        let r = sample();
        let out = serde_json::to_string(&r).unwrap();
        let zeta  = out.find("\"zeta\"").unwrap();
        let alpha = out.find("\"alpha\"").unwrap();
        assert!(zeta < alpha, "payload keys were reordered: {out}");
    }

    #[test]
    fn status_serializes_lowercase() {
        let r = sample().classified(ReferenceStatus::Relocated, Utc::now());
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["status"], "relocated");
        assert!(v["lastChecked"].is_string());
    }

    #[test]
    fn file_name_prefers_path_component() {
        let mut r = sample();
        r.name = "Renamed In UI".into();
        assert_eq!(r.file_name(), "clip.mp4");
    }

    fn asset_at(path: &Path) -> MediaAsset {
        MediaAsset {
            id:             "live".into(),
            name:           "a.mp4".into(),
            path:           path.to_path_buf(),
            is_video:       true,
            is_audio:       false,
            is_image:       false,
            size:           2048,
            duration:       Some(30.0),
            start_time:     Some(1.5),
            probe_data:     Some(json!({ "codec": "h264" })),
            music_metadata: None,
        }
    }

    #[test]
    fn capture_under_project_records_relative_path_and_derived_id() {
        let tmp = tempfile::TempDir::new().unwrap();
        let clip = tmp.path().join("media").join("a.mp4");
        std::fs::create_dir_all(clip.parent().unwrap()).unwrap();
        std::fs::write(&clip, b"x").unwrap();

        let r = SavedMediaReference::capture(&asset_at(&clip), 1_700_000_000_000, &tmp.path().join("p.json"));

        assert_eq!(r.relative_path.as_deref(), Some("media/a.mp4"));
        assert_eq!(r.id, derive_reference_id(&clip, 2048, 1_700_000_000_000));
        assert_eq!(r.original_path, clip);
        assert_eq!(r.status, ReferenceStatus::Unknown);
        assert!(r.last_checked.is_none());
    }

    #[test]
    fn capture_outside_project_has_no_relative_path() {
        let project = tempfile::TempDir::new().unwrap();
        let elsewhere = tempfile::TempDir::new().unwrap();
        let clip = elsewhere.path().join("a.mp4");
        std::fs::write(&clip, b"x").unwrap();

        let r = SavedMediaReference::capture(&asset_at(&clip), 0, &project.path().join("p.json"));
        assert_eq!(r.relative_path, None);
    }

    #[test]
    fn capture_writes_prober_fields_in_order() {
        let r = SavedMediaReference::capture(&asset_at(Path::new("/abs/a.mp4")), 0, Path::new("/proj/p.json"));

        let keys: Vec<&str> = r.metadata.0.keys().map(String::as_str).collect();
        assert_eq!(keys, ["duration", "startTime", "probeData"]);
        assert_eq!(r.metadata.duration(), Some(30.0));
        assert_eq!(r.metadata.start_time(), Some(1.5));
        assert_eq!(r.metadata.probe_data(), Some(&json!({ "codec": "h264" })));
    }
}
