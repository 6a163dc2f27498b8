// crates/relink-core/src/project.rs
//
// The slice of a project file the restoration engine cares about: the media
// and music reference lists. Every other key in the file (timeline, aspect
// ratio, transitions, ...) is carried through `rest` untouched, and the two
// lists are written back at their original position, so a load → apply → save
// cycle neither loses editor data nor reorders the document.
//
// The engine itself never writes projects. This is for the project-file owner
// (the editor, or the relink CLI) to fold a pass back into what it persists.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::paths;
use crate::reference::{ReferenceStatus, SavedMediaReference, SavedMusicReference};
use crate::resolution::ResolutionOutcome;
use crate::result::RestorationResult;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ProjectFile {
    pub media: Vec<SavedMediaReference>,
    pub music: Vec<SavedMusicReference>,
    /// The rest of the document in file order. A loaded file keeps a null
    /// placeholder under `media` / `music` to hold their position.
    pub rest:  Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for ProjectFile {
    type Error = serde_json::Error;

    fn try_from(mut rest: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let media = take_list(&mut rest, "media")?;
        let music = take_list(&mut rest, "music")?;
        Ok(Self { media, music, rest })
    }
}

impl Serialize for ProjectFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.rest {
            match key.as_str() {
                "media" => map.serialize_entry(key, &self.media)?,
                "music" => map.serialize_entry(key, &self.music)?,
                _       => map.serialize_entry(key, value)?,
            }
        }
        // New documents have no placeholders; the lists go last.
        if !self.rest.contains_key("media") {
            map.serialize_entry("media", &self.media)?;
        }
        if !self.rest.contains_key("music") {
            map.serialize_entry("music", &self.music)?;
        }
        map.end()
    }
}

/// Decode one reference list, leaving a null in its slot. A missing key is an
/// empty list.
fn take_list(doc: &mut Map<String, Value>, key: &str) -> serde_json::Result<Vec<SavedMediaReference>> {
    match doc.get_mut(key) {
        Some(slot) => serde_json::from_value(slot.take()),
        None       => Ok(Vec::new()),
    }
}

impl ProjectFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn reference_count(&self) -> usize {
        self.media.len() + self.music.len()
    }

    /// Fold a pass result back into the saved references: stamp status and
    /// check time, re-point relocated references at their new path, and
    /// refresh the absolute path of ones found through their relative path.
    pub fn apply_restoration(&mut self, result: &RestorationResult, project_file: &Path) {
        let now = Utc::now();

        let mut updates: HashMap<&str, Update> = HashMap::new();
        for a in result.restored_media.iter().chain(&result.restored_music) {
            updates.insert(&a.id, Update::Found(a.path.clone(), now));
        }
        for r in &result.relocated_files {
            updates.insert(&r.original.id, Update::Moved(r.new_path.clone(), stamp(&r.original, now)));
        }
        for c in &result.corrupted_files {
            updates.insert(&c.reference.id, Update::Status(ReferenceStatus::Corrupted, stamp(&c.reference, now)));
        }
        for m in &result.missing_files {
            updates.insert(&m.id, Update::Status(ReferenceStatus::Missing, stamp(m, now)));
        }

        for r in self.media.iter_mut().chain(self.music.iter_mut()) {
            match updates.get(r.id.as_str()) {
                Some(Update::Status(status, at)) => {
                    r.status       = *status;
                    r.last_checked = Some(*at);
                }
                Some(Update::Found(path, at)) => {
                    // Resolved through relativePath after the project folder
                    // moved: the saved absolute path is stale.
                    if r.original_path != *path {
                        r.original_path = path.clone();
                    }
                    r.status       = ReferenceStatus::Available;
                    r.last_checked = Some(*at);
                }
                Some(Update::Moved(path, at)) => {
                    repoint(r, path, project_file);
                    r.last_checked = Some(*at);
                }
                None => {}
            }
        }
    }

    /// Apply the user's decisions: drop removed references, re-point found
    /// ones at the path the user picked.
    pub fn apply_resolution(&mut self, outcome: &ResolutionOutcome, project_file: &Path) {
        let removed: HashSet<&str> = outcome.removed_files.iter().map(|r| r.id.as_str()).collect();
        let found: HashMap<&str, &Path> = outcome
            .found_files
            .iter()
            .map(|a| (a.id.as_str(), a.path.as_path()))
            .collect();

        self.media.retain(|r| !removed.contains(r.id.as_str()));
        self.music.retain(|r| !removed.contains(r.id.as_str()));

        let now = Utc::now();
        for r in self.media.iter_mut().chain(self.music.iter_mut()) {
            if let Some(path) = found.get(r.id.as_str()) {
                repoint(r, path, project_file);
                r.last_checked = Some(now);
            }
        }
    }
}

enum Update {
    Status(ReferenceStatus, DateTime<Utc>),
    Found(PathBuf, DateTime<Utc>),
    Moved(PathBuf, DateTime<Utc>),
}

fn stamp(r: &SavedMediaReference, fallback: DateTime<Utc>) -> DateTime<Utc> {
    r.last_checked.unwrap_or(fallback)
}

fn repoint(r: &mut SavedMediaReference, path: &Path, project_file: &Path) {
    r.original_path = path.to_path_buf();
    r.relative_path = paths::to_relative(path, project_file);
    r.status        = ReferenceStatus::Relocated;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MediaAsset;
    use crate::result::RelocatedFile;
    use crate::reference::ReferenceKind;
    use serde_json::json;
    use tempfile::TempDir;

    fn project_json() -> Value {
        json!({
            "aspectRatio": "SixteenNine",
            "timeline": [{ "id": "t1" }],
            "media": [
                { "id": "m1", "originalPath": "/old/a.mp4", "name": "a.mp4", "size": 1, "lastModified": 0, "isVideo": true },
                { "id": "m2", "originalPath": "/old/b.mp4", "name": "b.mp4", "size": 1, "lastModified": 0, "isVideo": true }
            ],
            "music": [
                { "id": "s1", "originalPath": "/old/song.mp3", "name": "song.mp3", "size": 1, "lastModified": 0, "isAudio": true,
                  "musicMetadata": { "artist": "X", "year": 1999 } }
            ]
        })
    }

    #[test]
    fn unknown_keys_survive_load_save() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("p.json");
        std::fs::write(&path, project_json().to_string()).unwrap();

        let p = ProjectFile::load(&path).unwrap();
        assert_eq!(p.reference_count(), 3);
        p.save(&path).unwrap();

        let back: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back["timeline"][0]["id"], "t1");
        assert_eq!(back["aspectRatio"], "SixteenNine");
        assert_eq!(back["music"][0]["musicMetadata"]["year"], 1999);
    }

    #[test]
    fn restoration_stamps_status_and_moves_paths() {
        let mut p: ProjectFile = serde_json::from_value(project_json()).unwrap();
        let mut result = RestorationResult::default();
        result.restored_media.push(MediaAsset::from_reference(&p.media[0], Path::new("/old/a.mp4")));
        result.relocated_files.push(RelocatedFile {
            original:   p.media[1].clone(),
            new_path:   PathBuf::from("/new/b.mp4"),
            kind:       ReferenceKind::Media,
            confidence: 1.0,
        });
        result.missing_files.push(p.music[0].clone());
        result.finalize_stats(3);

        p.apply_restoration(&result, Path::new("/projects/show/p.json"));

        assert_eq!(p.media[0].status, ReferenceStatus::Available);
        assert_eq!(p.media[1].status, ReferenceStatus::Relocated);
        assert_eq!(p.media[1].original_path, PathBuf::from("/new/b.mp4"));
        assert_eq!(p.music[0].status, ReferenceStatus::Missing);
        assert!(p.media.iter().chain(&p.music).all(|r| r.last_checked.is_some()));
    }

    #[test]
    fn resolution_removes_and_repoints() {
        let mut p: ProjectFile = serde_json::from_value(project_json()).unwrap();
        let outcome = ResolutionOutcome {
            found_files:   vec![MediaAsset::from_reference(&p.music[0], Path::new("/found/song.mp3"))],
            removed_files: vec![p.media[1].clone()],
        };

        p.apply_resolution(&outcome, Path::new("/projects/show/p.json"));

        assert_eq!(p.media.len(), 1);
        assert_eq!(p.music[0].original_path, PathBuf::from("/found/song.mp3"));
        assert_eq!(p.music[0].relative_path, None);
    }

    #[test]
    fn save_keeps_document_key_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("p.json");
        std::fs::write(
            &path,
            r#"{"name":"Demo","media":[],"music":[],"timeline":[]}"#,
        )
        .unwrap();

        ProjectFile::load(&path).unwrap().save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let at = |k: &str| text.find(&format!("\"{k}\"")).unwrap();
        assert!(at("name") < at("media"));
        assert!(at("media") < at("music"));
        assert!(at("music") < at("timeline"));
    }

    #[test]
    fn new_document_serializes_both_lists() {
        let v = serde_json::to_value(ProjectFile::default()).unwrap();
        assert_eq!(v, json!({ "media": [], "music": [] }));
    }

    #[test]
    fn project_without_lists_loads_empty() {
        let p: ProjectFile = serde_json::from_value(json!({ "name": "Empty" })).unwrap();
        assert_eq!(p.reference_count(), 0);
        assert_eq!(p.rest["name"], "Empty");
    }

    #[test]
    fn moved_project_refreshes_absolute_path_of_relative_hits() {
        let tmp = TempDir::new().unwrap();
        let media_dir = tmp.path().join("media");
        std::fs::create_dir_all(&media_dir).unwrap();
        let clip = media_dir.join("a.mp4");
        std::fs::write(&clip, b"clip").unwrap();

        let asset = MediaAsset {
            id:             "a".into(),
            name:           "a.mp4".into(),
            path:           clip.clone(),
            is_video:       true,
            is_audio:       false,
            is_image:       false,
            size:           4,
            duration:       None,
            start_time:     None,
            probe_data:     None,
            music_metadata: None,
        };
        let saved = SavedMediaReference::capture(&asset, 0, &tmp.path().join("p.json"));
        assert_eq!(saved.relative_path.as_deref(), Some("media/a.mp4"));

        let mut p = ProjectFile { media: vec![saved.clone()], ..ProjectFile::default() };
        let mut result = RestorationResult::default();
        result.restored_media.push(MediaAsset::from_reference(&saved, Path::new("/moved/media/a.mp4")));
        result.finalize_stats(1);

        p.apply_restoration(&result, Path::new("/moved/p.json"));

        assert_eq!(p.media[0].original_path, PathBuf::from("/moved/media/a.mp4"));
        assert_eq!(p.media[0].relative_path.as_deref(), Some("media/a.mp4"));
        assert_eq!(p.media[0].status, ReferenceStatus::Available);
    }
}
