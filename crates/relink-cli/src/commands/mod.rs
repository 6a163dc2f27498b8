pub mod check;
pub mod fix;
pub mod projects;

use std::path::{Path, PathBuf};

use anyhow::Context;
use relink_core::project::ProjectFile;

/// Load a project and return it with its absolute path; the engine resolves
/// relative references against the project's real directory.
pub fn open_project(path: &Path) -> anyhow::Result<(ProjectFile, PathBuf)> {
    let abs = std::fs::canonicalize(path)
        .with_context(|| format!("project file not found: {}", path.display()))?;
    let project = ProjectFile::load(&abs)
        .with_context(|| format!("failed to read project {}", abs.display()))?;
    Ok((project, abs))
}
