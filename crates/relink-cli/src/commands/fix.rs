use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use relink_core::{generate_report, ResolutionDecision, RestoreConfig, RestoreOptions};
use relink_media::{RestorationController, Restorer};

use crate::cli::FixArgs;
use crate::commands::open_project;
use crate::exit_codes;

pub async fn execute(args: FixArgs, config: RestoreConfig) -> i32 {
    match run(args, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::EXECUTION_ERROR
        }
    }
}

async fn run(args: FixArgs, config: RestoreConfig) -> anyhow::Result<i32> {
    let (mut project, project_file) = open_project(&args.project)?;
    let decisions = match &args.decisions {
        Some(path) => Some(load_decisions(path)?),
        None => None,
    };

    let options = RestoreOptions { auto_resolve: args.auto_resolve, show_dialog: decisions.is_some() };
    let mut controller = RestorationController::new(Restorer::local(config));
    let outcome = controller
        .restore_project_media(&project.media, &project.music, &project_file, options)
        .await?;

    project.apply_restoration(&outcome.result, &project_file);
    print!("{}", generate_report(&outcome.result));

    let mut unresolved: HashSet<&str> = outcome.result.missing_files.iter().map(|r| r.id.as_str()).collect();

    if outcome.needs_user_input {
        let (relevant, stale): (Vec<_>, Vec<_>) = decisions
            .unwrap_or_default()
            .into_iter()
            .partition(|d| unresolved.contains(d.reference.id.as_str()));
        for d in &stale {
            log::warn!("[fix] ignoring decision for '{}': not missing in this pass", d.reference.name);
        }

        let resolution = controller.handle_missing_files_resolution(relevant);
        for f in &resolution.found_files {
            unresolved.remove(f.id.as_str());
        }
        for r in &resolution.removed_files {
            unresolved.remove(r.id.as_str());
        }
        project.apply_resolution(&resolution, &project_file);
        println!(
            "\nResolution: {} re-linked, {} removed, {} still missing",
            resolution.found_files.len(),
            resolution.removed_files.len(),
            unresolved.len()
        );
    }

    if args.write {
        project
            .save(&project_file)
            .with_context(|| format!("failed to write {}", project_file.display()))?;
        println!("\nSaved {}", project_file.display());
    } else {
        println!("\nDry run, pass --write to save changes to {}", project_file.display());
    }

    let needs_attention =
        outcome.result.stats.corrupted > 0 || (!unresolved.is_empty() && !args.auto_resolve);
    Ok(if needs_attention { exit_codes::UNRESOLVED } else { exit_codes::SUCCESS })
}

fn load_decisions(path: &Path) -> anyhow::Result<Vec<ResolutionDecision>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read decisions {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid decisions file {}", path.display()))
}
