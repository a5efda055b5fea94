//! Create command implementation
//!
//! Normalizes a song and packs it in one run. The normalized song is only
//! written when asked for.

use anyhow::{Context, Result};
use colored::Colorize;
use discpack_backend::{normalize, Notice};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{error_codes, input_error_to_json, JsonError, PackOutput};
use super::normalize::{normalize_and_write, print_notices};
use super::pack::{
    pack_and_write, pack_error_to_json, print_pack_error, print_pack_success, PackAttempt,
};
use super::{print_json, song_title};
use crate::input::{load_config, load_song};

/// Run the create command
///
/// # Arguments
/// * `song_path` - Path to the song file (JSON)
/// * `config_path` - Optional machine configuration file
/// * `compress` - Keep only even ticks and halve them
/// * `keep_formatted` - Also write "<name> (Formatted).json"
/// * `output` - Output file path for the layout
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    song_path: &str,
    config_path: Option<&str>,
    compress: bool,
    keep_formatted: bool,
    output: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(song_path, config_path, compress, keep_formatted, output)
    } else {
        run_human(song_path, config_path, compress, keep_formatted, output)
    }
}

/// Run create with human-readable (colored) output
fn run_human(
    song_path: &str,
    config_path: Option<&str>,
    compress: bool,
    keep_formatted: bool,
    output: Option<&str>,
) -> Result<ExitCode> {
    println!("{} {}", "Creating:".cyan().bold(), song_path);

    let config = load_config(config_path.map(Path::new)).context("Failed to load configuration")?;
    let loaded = load_song(Path::new(song_path))
        .with_context(|| format!("Failed to load song file: {}", song_path))?;
    let title = song_title(&loaded.song, song_path);

    let outcome = if keep_formatted {
        let (outcome, path) = normalize_and_write(&loaded.song, song_path, &config, compress, None)?;
        println!("{} {}", "Formatted:".dimmed(), path.display());
        outcome
    } else {
        normalize(&loaded.song, &config, compress)
    };
    print_notices(&outcome.notices);

    match pack_and_write(&outcome.song, &title, song_path, &config, output)? {
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

/// Run create with machine-readable JSON output
fn run_json(
    song_path: &str,
    config_path: Option<&str>,
    compress: bool,
    keep_formatted: bool,
    output: Option<&str>,
) -> Result<ExitCode> {
    let config = match load_config(config_path.map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            let error = input_error_to_json(&e, config_path.unwrap_or_default());
            return fail(vec![error], Vec::new());
        }
    };
    let loaded = match load_song(Path::new(song_path)) {
        Ok(loaded) => loaded,
        Err(e) => return fail(vec![input_error_to_json(&e, song_path)], Vec::new()),
    };
    let title = song_title(&loaded.song, song_path);

    let (outcome, formatted_path) = if keep_formatted {
        match normalize_and_write(&loaded.song, song_path, &config, compress, None) {
            Ok((outcome, path)) => (outcome, Some(path.display().to_string())),
            Err(e) => return fail(vec![write_error(&e)], Vec::new()),
        }
    } else {
        (normalize(&loaded.song, &config, compress), None)
    };

    match pack_and_write(&outcome.song, &title, song_path, &config, output) {
        Ok(PackAttempt::Written(result, path)) => {
            print_json(&PackOutput {
                success: true,
                errors: Vec::new(),
                notices: outcome.notices,
                formatted_path,
                output_path: Some(path.display().to_string()),
                hash: Some(result.hash),
                summary: Some(result.summary),
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(PackAttempt::Rejected(error)) => fail(pack_error_to_json(&error), outcome.notices),
        Err(e) => fail(vec![write_error(&e)], outcome.notices),
    }
}

fn write_error(e: &anyhow::Error) -> JsonError {
    JsonError::new(error_codes::WRITE_FAILED, format!("{:#}", e))
}

fn fail(errors: Vec<JsonError>, notices: Vec<Notice>) -> Result<ExitCode> {
    print_json(&PackOutput::failure(errors, notices))?;
    Ok(ExitCode::from(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use discpack_spec::{Note, Song};

    fn write_input(dir: &tempfile::TempDir, song: &Song) -> String {
        let path = dir.path().join("input.json");
        std::fs::write(&path, song.to_json_pretty().unwrap()).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn raw_song() -> Song {
        Song::new(
            "Raw Tune",
            3000,
            vec![
                Note::new(0, 0, 20),
                Note::new(0, 0, 21),
                Note::new(0, 0, 22),
                Note::new(0, 0, 23),
                Note::new(2, 30, 45),
                Note::new(2900, 1, 99),
            ],
        )
    }

    #[test]
    fn create_packs_raw_song() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_input(&tmp, &raw_song());

        assert_eq!(
            run(&path, None, true, false, None, false).unwrap(),
            ExitCode::SUCCESS
        );
        assert!(tmp.path().join("raw_tune.layout.json").exists());
        assert!(!tmp.path().join("Raw Tune (Formatted).json").exists());
    }

    #[test]
    fn create_keeps_formatted_copy_when_asked() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_input(&tmp, &raw_song());

        assert_eq!(
            run(&path, None, false, true, None, true).unwrap(),
            ExitCode::SUCCESS
        );
        assert!(tmp.path().join("Raw Tune (Formatted).json").exists());
        assert!(tmp.path().join("raw_tune.layout.json").exists());
    }
}
