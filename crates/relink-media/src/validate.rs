// crates/relink-media/src/validate.rs
//
// Integrity check: does the file at `live_path` look like the one the
// project saved? Compares name, size and mtime only, never file contents.
// Hashing multi-GB video on every project open is not an option, so a
// same-name, same-size, same-mtime impostor is accepted.
//
// Confidence starts at 1.0 and each mismatching signal subtracts its penalty
// from RestoreConfig. Valid ⇔ confidence ≥ validity_threshold.

use std::path::Path;

use relink_core::{RestoreConfig, SavedMediaReference};

use crate::probe::{FileProbe, FileStats};

pub const ISSUE_NOT_FOUND:  &str = "File does not exist";
pub const ISSUE_UNREADABLE: &str = "Unable to read file attributes";

#[derive(Clone, Debug, PartialEq)]
pub struct ValidationResult {
    pub is_valid:   bool,
    /// 0.0–1.0.
    pub confidence: f64,
    pub issues:     Vec<String>,
    /// False when the path is absent *or* unstat-able. Separates "missing"
    /// from "corrupted" for the orchestrator.
    pub exists:     bool,
}

impl ValidationResult {
    fn absent(issue: &str) -> Self {
        Self { is_valid: false, confidence: 0.0, issues: vec![issue.to_owned()], exists: false }
    }
}

pub async fn validate(
    probe:     &dyn FileProbe,
    live_path: &Path,
    reference: &SavedMediaReference,
    config:    &RestoreConfig,
) -> ValidationResult {
    if !probe.exists(live_path).await {
        return ValidationResult::absent(ISSUE_NOT_FOUND);
    }
    // Present but unstat-able (permissions, vanished between calls, not a
    // regular file) is treated as not found.
    let Some(stats) = probe.stat(live_path).await else {
        return ValidationResult::absent(ISSUE_UNREADABLE);
    };

    let file_name = live_path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    score(&file_name, stats, reference, config)
}

/// Pure scoring half of `validate`, for a file known to exist.
pub fn score(
    file_name: &str,
    stats:     FileStats,
    reference: &SavedMediaReference,
    config:    &RestoreConfig,
) -> ValidationResult {
    let mut confidence = 1.0_f64;
    let mut issues     = Vec::new();

    if file_name != reference.name {
        confidence -= config.name_penalty;
        issues.push(format!("Name mismatch: expected '{}', found '{file_name}'", reference.name));
    }

    if stats.size.abs_diff(reference.size) > config.size_tolerance_bytes {
        confidence -= config.size_penalty;
        issues.push(format!(
            "Size mismatch: expected {} bytes, found {} bytes",
            reference.size, stats.size
        ));
    }

    let drift = stats.last_modified.abs_diff(reference.last_modified);
    if drift > config.timestamp_tolerance_ms.unsigned_abs() {
        confidence -= config.timestamp_penalty;
        issues.push(format!("Modified time mismatch: off by {drift} ms"));
    }

    let confidence = confidence.clamp(0.0, 1.0);
    ValidationResult {
        is_valid: confidence >= config.validity_threshold,
        confidence,
        issues,
        exists: true,
    }
}

/// Existence-only check for images: they're passed through without attribute
/// comparison.
pub async fn validate_existence(probe: &dyn FileProbe, live_path: &Path) -> ValidationResult {
    if probe.exists(live_path).await {
        ValidationResult { is_valid: true, confidence: 1.0, issues: Vec::new(), exists: true }
    } else {
        ValidationResult::absent(ISSUE_NOT_FOUND)
    }
}
