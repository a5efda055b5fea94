//! discpack CLI - Command-line interface for packing note-block songs
//!
//! This binary provides commands for validating, normalizing and packing
//! songs into container layouts.

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

mod cli_args;

use cli_args::{Cli, Commands};
use discpack_cli::{commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.config.as_deref();
    let json = cli.json;

    let result = match cli.command {
        Commands::Validate { song } => commands::validate::run(&song, config, json),
        Commands::Normalize {
            song,
            compress,
            output,
        } => commands::normalize::run(&song, config, compress, output.as_deref(), json),
        Commands::Pack { song, output } => {
            commands::pack::run(&song, config, output.as_deref(), json)
        }
        Commands::Create {
            song,
            compress,
            keep_formatted,
            output,
        } => commands::create::run(
            &song,
            config,
            compress,
            keep_formatted,
            output.as_deref(),
            json,
        ),
        Commands::Config { output } => commands::config::run(config, output.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}
