//! Pack command implementation
//!
//! Packs a normalized song into a container layout and writes the layout
//! (placements, hash and summary) as JSON.

use anyhow::{Context, Result};
use colored::Colorize;
use discpack_backend::{layout_file_name, pack_song, PackError, PackResult};
use discpack_spec::{PackConfig, Song};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::json_output::{
    error_codes, input_error_to_json, violation_to_json, JsonError, PackOutput,
};
use super::{output_path, print_json, song_title, write_layout};
use crate::input::{load_config, load_song};

/// Run the pack command
///
/// # Arguments
/// * `song_path` - Path to the song file (JSON)
/// * `config_path` - Optional machine configuration file
/// * `output` - Output file path (default: "<slug>.layout.json" next to the song)
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    song_path: &str,
    config_path: Option<&str>,
    output: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(song_path, config_path, output)
    } else {
        run_human(song_path, config_path, output)
    }
}

/// Outcome of packing and writing a layout.
pub(crate) enum PackAttempt {
    /// The layout was written.
    Written(PackResult, PathBuf),
    /// Packing failed; nothing was written.
    Rejected(PackError),
}

/// Packs a song and writes the layout file if packing succeeds.
///
/// `title` names the default output file.
pub(crate) fn pack_and_write(
    song: &Song,
    title: &str,
    song_path: &str,
    config: &PackConfig,
    output: Option<&str>,
) -> Result<PackAttempt> {
    let result = match pack_song(song, config) {
        Ok(result) => result,
        Err(e) => return Ok(PackAttempt::Rejected(e)),
    };
    let path = output_path(song_path, output, &layout_file_name(title));
    write_layout(&path, &result)?;
    Ok(PackAttempt::Written(result, path))
}

/// Prints a packing error, listing violations when the song was rejected.
pub(crate) fn print_pack_error(error: &PackError) {
    if let PackError::SongNotNormalized { violations } = error {
        for violation in violations {
            println!("  {} {}", "x".red(), violation);
        }
    }
    println!(
        "\n{} [{}] {}",
        "FAILED".red().bold(),
        error.code(),
        error
    );
}

/// Prints the summary of a written layout.
pub(crate) fn print_pack_success(result: &PackResult, path: &Path) {
    let summary = &result.summary;
    println!(
        "{} {} modules, {} lanes filled, {} empty, {} pages over {} ticks",
        "Layout:".dimmed(),
        summary.modules,
        summary.present_lanes,
        summary.absent_lanes,
        summary.pages,
        summary.adjusted_length
    );
    println!("{} {}", "Hash:".dimmed(), &result.hash[..16]);
    println!(
        "\n{} Layout written to: {}",
        "SUCCESS".green().bold(),
        path.display()
    );
}

/// Converts a packing error to JSON errors, one per violation when the song
/// was rejected by validation.
pub(crate) fn pack_error_to_json(error: &PackError) -> Vec<JsonError> {
    let mut errors = vec![JsonError::new(error.code(), error.to_string())];
    if let PackError::SongNotNormalized { violations } = error {
        errors.extend(violations.iter().map(violation_to_json));
    }
    errors
}

/// Run pack with human-readable (colored) output
fn run_human(song_path: &str, config_path: Option<&str>, output: Option<&str>) -> Result<ExitCode> {
    println!("{} {}", "Packing:".cyan().bold(), song_path);

    let config = load_config(config_path.map(Path::new)).context("Failed to load configuration")?;
    let loaded = load_song(Path::new(song_path))
        .with_context(|| format!("Failed to load song file: {}", song_path))?;
    let title = song_title(&loaded.song, song_path);

    match pack_and_write(&loaded.song, &title, song_path, &config, output)? {
        PackAttempt::Written(result, path) => {
            print_pack_success(&result, &path);
            Ok(ExitCode::SUCCESS)
        }
        PackAttempt::Rejected(error) => {
            print_pack_error(&error);
            Ok(ExitCode::from(1))
        }
    }
}

/// Run pack with machine-readable JSON output
fn run_json(song_path: &str, config_path: Option<&str>, output: Option<&str>) -> Result<ExitCode> {
    let config = match load_config(config_path.map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            let error = input_error_to_json(&e, config_path.unwrap_or_default());
            return fail(vec![error]);
        }
    };
    let loaded = match load_song(Path::new(song_path)) {
        Ok(loaded) => loaded,
        Err(e) => return fail(vec![input_error_to_json(&e, song_path)]),
    };
    let title = song_title(&loaded.song, song_path);

    match pack_and_write(&loaded.song, &title, song_path, &config, output) {
        Ok(PackAttempt::Written(result, path)) => {
            print_json(&PackOutput {
                success: true,
                errors: Vec::new(),
                notices: Vec::new(),
                formatted_path: None,
                output_path: Some(path.display().to_string()),
                hash: Some(result.hash),
                summary: Some(result.summary),
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(PackAttempt::Rejected(error)) => fail(pack_error_to_json(&error)),
        Err(e) => fail(vec![JsonError::new(
            error_codes::WRITE_FAILED,
            format!("{:#}", e),
        )]),
    }
}

fn fail(errors: Vec<JsonError>) -> Result<ExitCode> {
    print_json(&PackOutput::failure(errors, Vec::new()))?;
    Ok(ExitCode::from(1))
}
