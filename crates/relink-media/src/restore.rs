// crates/relink-media/src/restore.rs
//
// The orchestrator: one restoration pass over a whole project.
//
// Per reference:
//   1. resolve: relativePath against the *current* project dir (survives the
//      project folder being moved as a unit), else originalPath
//   2. validate the resolved path
//   3. valid                → available, promoted to a MediaAsset
//   4. exists but invalid   → corrupted
//   5. absent               → name search under the expected parent dir(s),
//                             then the project dir; best valid candidate wins
//                             → relocated, otherwise missing
//
// References run in batches of `batch_size` spawned tasks. A task that panics
// is classified missing; one bad file never stops the others. The only error
// this returns is an unusable project path.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use relink_core::{
    paths, CorruptedFile, MediaAsset, ReferenceKind, ReferenceStatus, RelocatedFile, RestorationResult,
    RestoreConfig, RestoreError, RestoreOptions, Result, SavedMediaReference, SavedMusicReference,
};

use crate::probe::{FileProbe, LocalProbe};
use crate::search::{find_candidates, search_roots};
use crate::validate::{validate, validate_existence};

// ── Progress ──────────────────────────────────────────────────────────────────

/// Processed/total counters for the pass in flight. Shared by Arc so a UI
/// thread can poll it while the pass owns the restorer.
#[derive(Debug, Default)]
pub struct RestoreProgress {
    processed: AtomicUsize,
    total:     AtomicUsize,
}

impl RestoreProgress {
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// 0.0–1.0. An empty pass counts as done.
    pub fn fraction(&self) -> f64 {
        match self.total() {
            0 => 1.0,
            t => (self.processed() as f64 / t as f64).min(1.0),
        }
    }

    fn reset(&self, total: usize) {
        self.processed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    fn tick(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }
}

// ── Restorer ──────────────────────────────────────────────────────────────────

pub struct Restorer {
    probe:    Arc<dyn FileProbe>,
    config:   Arc<RestoreConfig>,
    progress: Arc<RestoreProgress>,
}

impl Restorer {
    pub fn new(probe: Arc<dyn FileProbe>, config: RestoreConfig) -> Self {
        Self {
            probe,
            config:   Arc::new(config),
            progress: Arc::new(RestoreProgress::default()),
        }
    }

    /// Restorer over the local filesystem with the config's probe timeout.
    pub fn local(config: RestoreConfig) -> Self {
        let probe = Arc::new(LocalProbe::from_config(&config));
        Self::new(probe, config)
    }

    pub fn progress(&self) -> Arc<RestoreProgress> {
        Arc::clone(&self.progress)
    }

    /// Run one pass. Must be called from inside a tokio runtime.
    pub async fn restore(
        &self,
        media:        &[SavedMediaReference],
        music:        &[SavedMusicReference],
        project_file: &Path,
        options:      &RestoreOptions,
    ) -> Result<RestorationResult> {
        let project_dir = resolve_project_dir(project_file)?;

        let jobs: Vec<(ReferenceKind, SavedMediaReference)> = media
            .iter()
            .map(|r| (ReferenceKind::Media, r.clone()))
            .chain(music.iter().map(|r| (ReferenceKind::Music, r.clone())))
            .collect();
        let total = jobs.len();
        self.progress.reset(total);

        log::info!(
            "[restore] pass start: {} media, {} music, project {} (auto_resolve={})",
            media.len(), music.len(), project_file.display(), options.auto_resolve,
        );

        let pass = PassContext {
            probe:        Arc::clone(&self.probe),
            config:       Arc::clone(&self.config),
            project_file: project_file.to_path_buf(),
            project_dir,
        };

        let mut result = RestorationResult::default();
        for batch in jobs.chunks(self.config.batch_size.max(1)) {
            // Spawned rather than joined in place so a panicking probe is
            // contained to its own task.
            let handles = batch.iter().cloned().map(|(_, reference)| {
                let pass = pass.clone();
                tokio::spawn(async move { pass.classify(&reference).await })
            });
            let outcomes = join_all(handles).await;

            for ((kind, reference), joined) in batch.iter().zip(outcomes) {
                let outcome = joined.unwrap_or_else(|e| {
                    log::warn!("[restore] check for '{}' failed ({e}), marking missing", reference.name);
                    Outcome::Missing(reference.classified(ReferenceStatus::Missing, Utc::now()))
                });
                outcome.record(*kind, &mut result);
                self.progress.tick();
            }
        }

        result.finalize_stats(total);
        debug_assert!(result.is_partitioned(), "classification dropped a reference");

        let s = &result.stats;
        log::info!(
            "[restore] pass done: {} restored, {} relocated, {} missing, {} corrupted of {}",
            s.restored, s.relocated, s.missing, s.corrupted, s.total,
        );
        Ok(result)
    }
}

/// Absolute project file with a real parent directory, or the pass can't run.
fn resolve_project_dir(project_file: &Path) -> Result<PathBuf> {
    if !project_file.is_absolute() {
        return Err(RestoreError::InvalidProjectPath(project_file.to_path_buf()));
    }
    paths::project_dir(project_file)
        .map(Path::to_path_buf)
        .ok_or_else(|| RestoreError::InvalidProjectPath(project_file.to_path_buf()))
}

// ── Per-reference classification ──────────────────────────────────────────────

enum Outcome {
    Available(MediaAsset),
    Relocated { reference: SavedMediaReference, new_path: PathBuf, confidence: f64 },
    Corrupted { reference: SavedMediaReference, path: PathBuf, confidence: f64, issues: Vec<String> },
    Missing(SavedMediaReference),
}

impl Outcome {
    fn record(self, kind: ReferenceKind, result: &mut RestorationResult) {
        match self {
            Outcome::Available(asset) => match kind {
                ReferenceKind::Media => result.restored_media.push(asset),
                ReferenceKind::Music => result.restored_music.push(asset),
            },
            Outcome::Relocated { reference, new_path, confidence } => {
                result.relocated_files.push(RelocatedFile { original: reference, new_path, kind, confidence });
            }
            Outcome::Corrupted { reference, path, confidence, issues } => {
                result.corrupted_files.push(CorruptedFile { reference, path, kind, confidence, issues });
            }
            Outcome::Missing(reference) => result.missing_files.push(reference),
        }
    }
}

/// Everything one task needs, cheap to clone into each spawned future.
#[derive(Clone)]
struct PassContext {
    probe:        Arc<dyn FileProbe>,
    config:       Arc<RestoreConfig>,
    project_file: PathBuf,
    project_dir:  PathBuf,
}

impl PassContext {
    async fn classify(&self, reference: &SavedMediaReference) -> Outcome {
        let relative = reference
            .relative_path
            .as_deref()
            .map(|rel| paths::to_absolute(rel, &self.project_file));
        let resolved = self.resolve(reference, relative.as_deref()).await;

        if reference.is_image {
            return self.classify_image(reference, resolved).await;
        }

        let check = validate(self.probe.as_ref(), &resolved, reference, &self.config).await;
        let now   = Utc::now();

        if check.is_valid {
            log::debug!("[restore] available: {}", resolved.display());
            return Outcome::Available(MediaAsset::from_reference(reference, &resolved));
        }
        if check.exists {
            log::debug!("[restore] corrupted: {} ({})", resolved.display(), check.issues.join("; "));
            return Outcome::Corrupted {
                reference:  reference.classified(ReferenceStatus::Corrupted, now),
                path:       resolved,
                confidence: check.confidence,
                issues:     check.issues,
            };
        }

        let mut expected: Vec<&Path> = vec![resolved.as_path()];
        expected.extend(relative.as_deref());
        expected.push(reference.original_path.as_path());

        match self.relocate(reference, &resolved, &expected).await {
            Some((new_path, confidence)) => {
                log::debug!("[restore] relocated: {} → {}", reference.original_path.display(), new_path.display());
                Outcome::Relocated {
                    reference: reference.classified(ReferenceStatus::Relocated, now),
                    new_path,
                    confidence,
                }
            }
            None => {
                log::debug!("[restore] missing: {}", reference.original_path.display());
                Outcome::Missing(reference.classified(ReferenceStatus::Missing, now))
            }
        }
    }

    /// Prefer the project-relative location when it exists; otherwise the
    /// recorded absolute path.
    async fn resolve(&self, reference: &SavedMediaReference, relative: Option<&Path>) -> PathBuf {
        if let Some(rel) = relative {
            if rel == reference.original_path || self.probe.exists(rel).await {
                return rel.to_path_buf();
            }
        }
        reference.original_path.clone()
    }

    async fn classify_image(&self, reference: &SavedMediaReference, resolved: PathBuf) -> Outcome {
        if validate_existence(self.probe.as_ref(), &resolved).await.is_valid {
            Outcome::Available(MediaAsset::from_reference(reference, &resolved))
        } else {
            Outcome::Missing(reference.classified(ReferenceStatus::Missing, Utc::now()))
        }
    }

    /// Search each root in turn; the first root with a valid candidate wins,
    /// and within a root the highest confidence wins (ties → first in path
    /// order, so repeated passes pick the same file).
    async fn relocate(
        &self,
        reference: &SavedMediaReference,
        resolved:  &Path,
        expected:  &[&Path],
    ) -> Option<(PathBuf, f64)> {
        let name = reference.file_name();
        for root in search_roots(expected, &self.project_dir) {
            let candidates =
                find_candidates(self.probe.as_ref(), &root, &name, self.config.search_depth).await;

            let mut best: Option<(PathBuf, f64)> = None;
            for candidate in candidates {
                if candidate == resolved {
                    continue;
                }
                let check = validate(self.probe.as_ref(), &candidate, reference, &self.config).await;
                if !check.is_valid {
                    continue;
                }
                if best.as_ref().map_or(true, |(_, c)| check.confidence > *c) {
                    best = Some((candidate, check.confidence));
                }
            }
            if best.is_some() {
                return best;
            }
        }
        None
    }
}
