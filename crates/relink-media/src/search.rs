// crates/relink-media/src/search.rs
//
// Candidate search: find files by exact name under a root, depth-capped.
// Only *finds*. Ranking candidates is the orchestrator's job, so this stays
// trivially testable against a real directory tree.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::probe::FileProbe;

/// Blocking walk used by `LocalProbe::search_by_name`.
///
/// Depth counts directory levels below `root`: depth 1 is `root/<file>`,
/// depth 2 is `root/<dir>/<file>`. Unreadable directories are skipped, not
/// fatal. Symlinks aren't followed so a link cycle can't blow the cap.
pub fn walk_for_name(root: &Path, file_name: &str, max_depth: usize) -> Vec<PathBuf> {
    let wanted = OsStr::new(file_name);
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::trace!("[search] skipping: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && e.file_name() == wanted)
        .map(walkdir::DirEntry::into_path)
        .collect();
    found.sort();
    found
}

/// All name matches for `file_name` under `root`. A zero depth or an empty
/// name searches nothing.
pub async fn find_candidates(
    probe:     &dyn FileProbe,
    root:      &Path,
    file_name: &str,
    max_depth: usize,
) -> Vec<PathBuf> {
    if max_depth == 0 || file_name.is_empty() {
        return Vec::new();
    }
    let found = probe.search_by_name(root, file_name, max_depth).await;
    log::debug!("[search] '{file_name}' under {}: {} match(es)", root.display(), found.len());
    found
}

/// Where to look for a missing file, most specific first: the parent of every
/// path it was expected at, then the project directory. Duplicates removed,
/// order kept.
pub fn search_roots(expected_at: &[&Path], project_dir: &Path) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    let parents = expected_at.iter().filter_map(|p| p.parent());
    for dir in parents.chain(std::iter::once(project_dir)) {
        if dir.as_os_str().is_empty() || roots.iter().any(|r| r == dir) {
            continue;
        }
        roots.push(dir.to_path_buf());
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, b"x").unwrap();
        p
    }

    #[test]
    fn depth_cap_is_hard() {
        let tmp = TempDir::new().unwrap();
        let shallow = touch(tmp.path(), "a.mp4");
        let mid     = touch(tmp.path(), "one/a.mp4");
        let _deep   = touch(tmp.path(), "one/two/three/a.mp4");

        assert_eq!(walk_for_name(tmp.path(), "a.mp4", 1), vec![shallow.clone()]);
        let two = walk_for_name(tmp.path(), "a.mp4", 2);
        assert_eq!(two, {
            let mut v = vec![shallow, mid];
            v.sort();
            v
        });
        assert_eq!(walk_for_name(tmp.path(), "a.mp4", 4).len(), 3);
    }

    #[test]
    fn matches_exact_name_only() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "sub/a.mp4.bak");
        touch(tmp.path(), "sub/A.MP4");
        fs::create_dir_all(tmp.path().join("a.mp4")).unwrap();
        assert!(walk_for_name(tmp.path(), "a.mp4", 3).is_empty());
    }

    #[test]
    fn missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(walk_for_name(&tmp.path().join("gone"), "a.mp4", 3).is_empty());
    }

    #[test]
    fn roots_are_deduplicated_in_order() {
        let roots = search_roots(
            &[Path::new("/proj/media/a.mp4"), Path::new("/old/a.mp4"), Path::new("/proj/media/b.mp4")],
            Path::new("/proj"),
        );
        assert_eq!(
            roots,
            vec![PathBuf::from("/proj/media"), PathBuf::from("/old"), PathBuf::from("/proj")]
        );
    }
}
