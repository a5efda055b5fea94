//! Config command implementation
//!
//! Prints or writes the default machine configuration, or the configuration
//! loaded with `--config` after it passes validation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use crate::input::load_config;

/// Run the config command
///
/// # Arguments
/// * `config_path` - Optional machine configuration file to echo back
/// * `output` - Output file path (default: stdout)
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(config_path: Option<&str>, output: Option<&str>) -> Result<ExitCode> {
    let config = load_config(config_path.map(Path::new)).context("Failed to load configuration")?;
    let json = config
        .to_json_pretty()
        .context("Failed to serialize configuration")?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write to: {}", path))?;
            println!(
                "{} Configuration written to: {}",
                "SUCCESS".green().bold(),
                path
            );
        }
        None => println!("{}", json),
    }

    Ok(ExitCode::SUCCESS)
}
