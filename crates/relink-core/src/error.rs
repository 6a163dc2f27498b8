// crates/relink-core/src/error.rs
//
// The one error type for the whole engine. Per-file problems never become a
// RestoreError; they are absorbed into a classification. Only pass-fatal
// conditions (unusable project path, bad config, worker gone) end up here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("project path is unusable: {}", .0.display())]
    InvalidProjectPath(PathBuf),

    #[error("invalid restore configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("restore worker unavailable: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, RestoreError>;
