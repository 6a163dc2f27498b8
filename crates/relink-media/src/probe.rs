// crates/relink-media/src/probe.rs
//
// The OS boundary. Everything the engine knows about the live filesystem
// comes through `FileProbe`.
//
// Contract: every call fails closed. An I/O error, a permission error or a
// timeout is logged and reported as "not found" / no stats / empty list,
// never propagated. A hung network mount stalls one call for at most the
// probe timeout, not the whole pass.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use async_trait::async_trait;
use relink_core::RestoreConfig;

use crate::search::walk_for_name;

/// The two attributes restoration compares besides the name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStats {
    pub size:          u64,
    /// Milliseconds since the Unix epoch, same unit as the saved reference.
    pub last_modified: i64,
}

#[async_trait]
pub trait FileProbe: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    /// None for anything that isn't a readable regular file.
    async fn stat(&self, path: &Path) -> Option<FileStats>;

    /// All regular files named exactly `file_name` at most `max_depth` levels
    /// below `root`, sorted.
    async fn search_by_name(&self, root: &Path, file_name: &str, max_depth: usize) -> Vec<PathBuf>;

    /// `*.json` files directly inside `dir`, sorted. Used to discover project
    /// files.
    async fn list_json_files(&self, dir: &Path) -> Vec<PathBuf>;
}

// ── LocalProbe ────────────────────────────────────────────────────────────────

/// `FileProbe` over the local filesystem via tokio::fs. Directory walks run
/// on the blocking pool.
#[derive(Clone, Debug)]
pub struct LocalProbe {
    timeout: Duration,
}

impl Default for LocalProbe {
    fn default() -> Self {
        Self::from_config(&RestoreConfig::default())
    }
}

impl LocalProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn from_config(config: &RestoreConfig) -> Self {
        Self::new(config.probe_timeout())
    }
}

#[async_trait]
impl FileProbe for LocalProbe {
    async fn exists(&self, path: &Path) -> bool {
        self.bounded("exists", path, tokio::fs::try_exists(path))
            .await
            .unwrap_or(false)
    }

    async fn stat(&self, path: &Path) -> Option<FileStats> {
        let meta = self.bounded("stat", path, tokio::fs::metadata(path)).await?;
        if !meta.is_file() {
            return None;
        }
        let modified = meta.modified().ok()?.duration_since(UNIX_EPOCH).ok()?;
        Some(FileStats {
            size:          meta.len(),
            last_modified: i64::try_from(modified.as_millis()).ok()?,
        })
    }

    async fn search_by_name(&self, root: &Path, file_name: &str, max_depth: usize) -> Vec<PathBuf> {
        let root = root.to_path_buf();
        let name = file_name.to_owned();
        let walk = tokio::task::spawn_blocking(move || walk_for_name(&root, &name, max_depth));
        match tokio::time::timeout(self.timeout, walk).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                log::warn!("[probe] search task failed: {e}");
                Vec::new()
            }
            Err(_) => {
                log::warn!("[probe] search for '{file_name}' timed out after {:?}", self.timeout);
                Vec::new()
            }
        }
    }

    async fn list_json_files(&self, dir: &Path) -> Vec<PathBuf> {
        self.bounded("read_dir", dir, read_json_dir(dir))
            .await
            .unwrap_or_default()
    }
}

impl LocalProbe {
    /// One filesystem call under the probe timeout. I/O errors and timeouts
    /// are logged and come back as None.
    async fn bounded<T, F>(&self, op: &str, path: &Path, call: F) -> Option<T>
    where
        F: Future<Output = io::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(v)) => Some(v),
            Ok(Err(e)) => {
                log::debug!("[probe] {op} {}: {e}", path.display());
                None
            }
            Err(_) => {
                log::warn!("[probe] {op} timed out after {:?}: {}", self.timeout, path.display());
                None
            }
        }
    }
}

/// `*.json` regular files directly in `dir`, sorted.
async fn read_json_dir(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut out = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if is_json && is_file {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn stat_reports_size_and_mtime() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("a.mp4");
        fs::write(&p, vec![0u8; 1024]).unwrap();

        let probe = LocalProbe::default();
        assert!(probe.exists(&p).await);
        let stats = probe.stat(&p).await.unwrap();
        assert_eq!(stats.size, 1024);
        assert!(stats.last_modified > 0);
    }

    #[tokio::test]
    async fn missing_and_directories_fail_closed() {
        let tmp = TempDir::new().unwrap();
        let probe = LocalProbe::default();
        assert!(!probe.exists(&tmp.path().join("nope.mp4")).await);
        assert_eq!(probe.stat(&tmp.path().join("nope.mp4")).await, None);
        assert_eq!(probe.stat(tmp.path()).await, None);
        assert!(probe.search_by_name(&tmp.path().join("gone"), "a.mp4", 3).await.is_empty());
    }

    #[tokio::test]
    async fn lists_only_json_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.json"), "{}").unwrap();
        fs::write(tmp.path().join("a.JSON"), "{}").unwrap();
        fs::write(tmp.path().join("c.mp4"), "x").unwrap();
        fs::create_dir(tmp.path().join("d.json")).unwrap();

        let found = LocalProbe::default().list_json_files(tmp.path()).await;
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.JSON", "b.json"]);
    }

    #[tokio::test]
    async fn hung_call_gives_up_at_the_timeout() {
        let probe = LocalProbe::new(Duration::from_millis(20));
        let hung = std::future::pending::<io::Result<Vec<PathBuf>>>();
        let started = std::time::Instant::now();
        assert_eq!(probe.bounded("read_dir", Path::new("/mnt/stalled"), hung).await, None);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn unreadable_dir_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let probe = LocalProbe::default();
        assert!(probe.list_json_files(&tmp.path().join("gone")).await.is_empty());
    }
}
