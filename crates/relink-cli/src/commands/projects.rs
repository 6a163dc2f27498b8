use anyhow::bail;
use relink_core::project::ProjectFile;
use relink_core::RestoreConfig;
use relink_media::{FileProbe, LocalProbe};
use serde::Serialize;

use crate::cli::ProjectsArgs;
use crate::exit_codes;
use crate::output;

#[derive(Serialize)]
struct ProjectEntry {
    path:  String,
    /// None when the file isn't a readable project.
    media: Option<usize>,
    music: Option<usize>,
}

pub async fn execute(args: ProjectsArgs, config: RestoreConfig) -> i32 {
    match run(args, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::EXECUTION_ERROR
        }
    }
}

async fn run(args: ProjectsArgs, config: RestoreConfig) -> anyhow::Result<i32> {
    if !args.dir.is_dir() {
        bail!("not a directory: {}", args.dir.display());
    }

    let probe = LocalProbe::from_config(&config);
    let entries: Vec<ProjectEntry> = probe
        .list_json_files(&args.dir)
        .await
        .into_iter()
        .map(|path| {
            let parsed = ProjectFile::load(&path).ok();
            ProjectEntry {
                path:  path.display().to_string(),
                media: parsed.as_ref().map(|p| p.media.len()),
                music: parsed.as_ref().map(|p| p.music.len()),
            }
        })
        .collect();

    if args.json {
        output::print_json(&entries)?;
        return Ok(exit_codes::SUCCESS);
    }

    if entries.is_empty() {
        println!("No project files in {}", args.dir.display());
    }
    for e in &entries {
        match (e.media, e.music) {
            (Some(media), Some(music)) => println!("{}  ({media} media, {music} music)", e.path),
            _ => println!("{}  (not a project)", e.path),
        }
    }
    Ok(exit_codes::SUCCESS)
}
