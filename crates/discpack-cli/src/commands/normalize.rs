//! Normalize command implementation
//!
//! Makes a song playable on the machine and writes the result as
//! "<name> (Formatted).json".

use anyhow::{Context, Result};
use colored::Colorize;
use discpack_backend::{formatted_name, normalize, NormalizeOutcome, Notice};
use discpack_spec::{PackConfig, Song};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::json_output::{error_codes, input_error_to_json, JsonError, NormalizeOutput};
use super::{output_path, print_json, song_title, write_song};
use crate::input::{load_config, load_song};

/// Run the normalize command
///
/// # Arguments
/// * `song_path` - Path to the song file (JSON)
/// * `config_path` - Optional machine configuration file
/// * `compress` - Keep only even ticks and halve them
/// * `output` - Output file path (default: "<name> (Formatted).json" next to the song)
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    song_path: &str,
    config_path: Option<&str>,
    compress: bool,
    output: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(song_path, config_path, compress, output)
    } else {
        run_human(song_path, config_path, compress, output)
    }
}

/// Normalizes a song and writes the formatted copy.
///
/// Returns the outcome (with the song under its original name) and the path
/// written to.
pub(crate) fn normalize_and_write(
    song: &Song,
    song_path: &str,
    config: &PackConfig,
    compress: bool,
    output: Option<&str>,
) -> Result<(NormalizeOutcome, PathBuf)> {
    let outcome = normalize(song, config, compress);

    let mut formatted = outcome.song.clone();
    formatted.name = formatted_name(&song_title(song, song_path));
    let path = output_path(song_path, output, &format!("{}.json", formatted.name));
    write_song(&path, &formatted)?;

    Ok((outcome, path))
}

/// Prints one line per notice.
pub(crate) fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("  {} {}", "!".yellow(), notice);
    }
}

/// Run normalize with human-readable (colored) output
fn run_human(
    song_path: &str,
    config_path: Option<&str>,
    compress: bool,
    output: Option<&str>,
) -> Result<ExitCode> {
    println!("{} {}", "Normalizing:".cyan().bold(), song_path);
    if compress {
        println!("{} half speed", "Compress:".dimmed());
    }

    let config = load_config(config_path.map(Path::new)).context("Failed to load configuration")?;
    let loaded = load_song(Path::new(song_path))
        .with_context(|| format!("Failed to load song file: {}", song_path))?;

    let (outcome, path) = normalize_and_write(&loaded.song, song_path, &config, compress, output)?;

    print_notices(&outcome.notices);
    println!(
        "\n{} {} of {} notes kept, written to: {}",
        "SUCCESS".green().bold(),
        outcome.song.notes.len(),
        loaded.song.notes.len(),
        path.display()
    );

    Ok(ExitCode::SUCCESS)
}

/// Run normalize with machine-readable JSON output
fn run_json(
    song_path: &str,
    config_path: Option<&str>,
    compress: bool,
    output: Option<&str>,
) -> Result<ExitCode> {
    let loaded = load_config(config_path.map(Path::new))
        .map_err(|e| input_error_to_json(&e, config_path.unwrap_or_default()))
        .and_then(|config| {
            load_song(Path::new(song_path))
                .map(|loaded| (config, loaded))
                .map_err(|e| input_error_to_json(&e, song_path))
        });
    let (config, loaded) = match loaded {
        Ok(pair) => pair,
        Err(error) => return fail(error, Vec::new()),
    };

    match normalize_and_write(&loaded.song, song_path, &config, compress, output) {
        Ok((outcome, path)) => {
            print_json(&NormalizeOutput {
                success: true,
                errors: Vec::new(),
                notices: outcome.notices,
                output_path: Some(path.display().to_string()),
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => fail(
            JsonError::new(error_codes::WRITE_FAILED, format!("{:#}", e)),
            Vec::new(),
        ),
    }
}

fn fail(error: JsonError, notices: Vec<Notice>) -> Result<ExitCode> {
    print_json(&NormalizeOutput {
        success: false,
        errors: vec![error],
        notices,
        output_path: None,
    })?;
    Ok(ExitCode::from(1))
}
