use relink_core::{generate_report, RestoreConfig, RestoreOptions};
use relink_media::{RestorationController, Restorer};

use crate::cli::CheckArgs;
use crate::commands::open_project;
use crate::exit_codes;
use crate::output;

pub async fn execute(args: CheckArgs, config: RestoreConfig) -> i32 {
    match run(args, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::EXECUTION_ERROR
        }
    }
}

async fn run(args: CheckArgs, config: RestoreConfig) -> anyhow::Result<i32> {
    let (project, project_file) = open_project(&args.project)?;

    // Nobody is going to answer a dialog from `check`.
    let options = RestoreOptions { auto_resolve: args.auto_resolve, show_dialog: false };
    let mut controller = RestorationController::new(Restorer::local(config));
    let outcome = controller
        .restore_project_media(&project.media, &project.music, &project_file, options)
        .await?;

    if args.json {
        output::print_json(&outcome.result)?;
    } else {
        print!("{}", generate_report(&outcome.result));
    }

    let s = outcome.result.stats;
    let needs_attention = s.corrupted > 0 || (s.missing > 0 && !args.auto_resolve);
    Ok(if needs_attention { exit_codes::UNRESOLVED } else { exit_codes::SUCCESS })
}
