use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use relink_core::RestoreConfig;

#[derive(Parser)]
#[command(
    name = "relink",
    version,
    about = "Check and repair media references in editor project files",
    long_about = "Reconciles the media and music references saved in a project file against \
                  the filesystem: finds moved files by bounded name search, flags missing and \
                  corrupted ones, and optionally writes the repaired references back."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML file with restore tuning (thresholds, penalties, depth, batch size)
    #[arg(long, global = true, env = "RELINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimum match confidence (0.0–1.0)
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Candidate search depth below each search root
    #[arg(long, global = true)]
    pub depth: Option<usize>,

    /// References checked concurrently
    #[arg(long, global = true)]
    pub batch_size: Option<usize>,
}

impl GlobalArgs {
    /// Config file (or defaults) with command-line overrides applied on top.
    pub fn restore_config(&self) -> anyhow::Result<RestoreConfig> {
        let mut config = match &self.config {
            Some(path) => RestoreConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RestoreConfig::default(),
        };
        if let Some(t) = self.threshold {
            config.validity_threshold = t;
        }
        if let Some(d) = self.depth {
            config.search_depth = d;
        }
        if let Some(b) = self.batch_size {
            config.batch_size = b;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a restoration pass and print the report
    Check(CheckArgs),
    /// Run a pass, apply relocations and resolution decisions, optionally save
    Fix(FixArgs),
    /// List project files in a directory
    Projects(ProjectsArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Project file (JSON)
    pub project: PathBuf,

    /// Print the full restoration result as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Don't treat missing files as needing attention (exit 0)
    #[arg(long)]
    pub auto_resolve: bool,
}

#[derive(Args)]
pub struct FixArgs {
    /// Project file (JSON)
    pub project: PathBuf,

    /// JSON array of {"ref", "newPath"?, "action": "found"|"remove"} decisions
    #[arg(long)]
    pub decisions: Option<PathBuf>,

    /// Write the repaired project back in place (default is a dry run)
    #[arg(long)]
    pub write: bool,

    /// Leave missing files out instead of expecting decisions for them
    #[arg(long)]
    pub auto_resolve: bool,
}

#[derive(Args)]
pub struct ProjectsArgs {
    /// Directory to scan (not recursive)
    pub dir: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}
