// crates/relink-media/src/testing.rs
//
// In-memory FileProbe + fixtures for unit tests. Lets tests script
// permission errors and panicking probes that a tempdir can't reproduce
// portably.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use relink_core::SavedMediaReference;
use serde_json::json;

use crate::probe::{FileProbe, FileStats};

#[derive(Default)]
pub(crate) struct MemoryProbe {
    files:      HashMap<PathBuf, FileStats>,
    /// Every call touching these paths behaves like an EACCES.
    failing:    HashSet<PathBuf>,
    unstatable: HashSet<PathBuf>,
    panicking:  HashSet<PathBuf>,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, size: u64, last_modified: i64) -> Self {
        self.files.insert(PathBuf::from(path), FileStats { size, last_modified });
        self
    }

    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(PathBuf::from(path));
        self
    }

    pub fn unstatable(mut self, path: &str) -> Self {
        self.unstatable.insert(PathBuf::from(path));
        self
    }

    pub fn panicking(mut self, path: &str) -> Self {
        self.panicking.insert(PathBuf::from(path));
        self
    }

    fn check_panic(&self, path: &Path) {
        if self.panicking.contains(path) {
            panic!("probe exploded on {}", path.display());
        }
    }
}

#[async_trait]
impl FileProbe for MemoryProbe {
    async fn exists(&self, path: &Path) -> bool {
        self.check_panic(path);
        !self.failing.contains(path) && self.files.contains_key(path)
    }

    async fn stat(&self, path: &Path) -> Option<FileStats> {
        self.check_panic(path);
        if self.failing.contains(path) || self.unstatable.contains(path) {
            return None;
        }
        self.files.get(path).copied()
    }

    async fn search_by_name(&self, root: &Path, file_name: &str, max_depth: usize) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|p| !self.failing.contains(*p))
            .filter(|p| p.file_name().is_some_and(|n| n == file_name))
            .filter(|p| match p.strip_prefix(root) {
                Ok(rel) => rel.components().count() <= max_depth,
                Err(_) => false,
            })
            .cloned()
            .collect();
        found.sort();
        found
    }

    async fn list_json_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter(|p| p.extension().is_some_and(|e| e == "json"))
            .cloned()
            .collect();
        found.sort();
        found
    }
}

/// A media reference as a project would have saved it.
pub(crate) fn reference(name: &str, path: &str, size: u64, last_modified: i64) -> SavedMediaReference {
    serde_json::from_value(json!({
        "id": format!("id-{path}"),
        "originalPath": path,
        "name": name,
        "size": size,
        "lastModified": last_modified,
        "isVideo": true,
        "metadata": { "duration": 10.0 }
    }))
    .expect("fixture reference")
}

pub(crate) fn music_reference(name: &str, path: &str, size: u64, last_modified: i64) -> SavedMediaReference {
    let mut r = reference(name, path, size, last_modified);
    r.is_video = false;
    r.is_audio = true;
    r.music_metadata = Some(relink_core::MusicMetadata {
        artist: Some("Someone".into()),
        ..Default::default()
    });
    r
}
