// crates/relink-cli/src/main.rs
//
// `relink`: run a restoration pass over a project file from the shell.
// The same engine the editor uses; this binary is just another project-file
// owner.

use clap::Parser;

mod cli;
mod commands;
mod exit_codes;
mod output;

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.global.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let config = match cli.global.restore_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::EXECUTION_ERROR);
        }
    };

    let exit_code = match cli.command {
        Command::Check(args)    => commands::check::execute(args, config).await,
        Command::Fix(args)      => commands::fix::execute(args, config).await,
        Command::Projects(args) => commands::projects::execute(args, config).await,
    };

    std::process::exit(exit_code);
}
