// crates/relink-core/src/paths.rs
//
// Single source of truth for "where does the project file live".
// Nothing else in the engine knows about the project directory. It asks here.
//
// Relative paths on disk are always POSIX ('/'-separated) so a project saved
// on one OS re-joins correctly on another.

use std::path::{Component, Path, PathBuf};

/// Directory containing the project file, or None for a bare file name /
/// root path (nothing to resolve against).
pub fn project_dir(project_file: &Path) -> Option<&Path> {
    project_file.parent().filter(|p| !p.as_os_str().is_empty())
}

/// `file_path` relative to the project directory, or None when it lives
/// outside the project tree.
///
/// Never errors: if the project directory can't be canonicalized the answer
/// is simply None and the caller falls back to the absolute path.
pub fn to_relative(file_path: &Path, project_file: &Path) -> Option<String> {
    let dir  = std::fs::canonicalize(project_dir(project_file)?).ok()?;
    // The asset may already be gone at save time; compare lexically then.
    let file = std::fs::canonicalize(file_path).unwrap_or_else(|_| normalize(file_path));

    let rel = file.strip_prefix(&dir).ok()?;
    let parts = rel
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<&str>>>()?;

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Re-join a saved relative path against the current project directory.
/// Pure, no I/O. Accepts '\' separators from projects written on Windows.
pub fn to_absolute(relative_path: &str, project_file: &Path) -> PathBuf {
    let mut out = project_dir(project_file)
        .map(Path::to_path_buf)
        .unwrap_or_default();
    for seg in relative_path.split(['/', '\\']).filter(|s| !s.is_empty()) {
        out.push(seg);
    }
    normalize(&out)
}

/// Lexical normalization: drops `.`, folds `..` into its parent. Never climbs
/// above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_))                   => { out.pop(); }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _                                            => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
