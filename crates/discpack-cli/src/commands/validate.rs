//! Validate command implementation
//!
//! Checks a song against the machine's constraints and reports every
//! violation without changing the song.

use anyhow::{Context, Result};
use colored::Colorize;
use discpack_spec::{validate_song, ValidationResult};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

use super::json_output::{input_error_to_json, violation_to_json, JsonError, ValidateOutput};
use super::print_json;
use crate::input::{load_config, load_song, LoadResult};

/// Run the validate command
///
/// # Arguments
/// * `song_path` - Path to the song file (JSON)
/// * `config_path` - Optional machine configuration file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if the song can be packed as-is, 1 otherwise
pub fn run(song_path: &str, config_path: Option<&str>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(song_path, config_path)
    } else {
        run_human(song_path, config_path)
    }
}

/// Run validate with human-readable (colored) output
fn run_human(song_path: &str, config_path: Option<&str>) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), song_path);

    let config = load_config(config_path.map(Path::new))
        .context("Failed to load configuration")?;
    let LoadResult { song, source_hash } = load_song(Path::new(song_path))
        .with_context(|| format!("Failed to load song file: {}", song_path))?;

    println!(
        "{} {} notes, length {} ({})",
        "Song:".dimmed(),
        song.notes.len(),
        song.length,
        &source_hash[..16]
    );

    let result = validate_song(&song, &config);
    debug!(violations = result.violations.len(), "validated song");
    print_violations(&result);

    if result.is_ok() {
        println!("\n{} Song can be packed as-is", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} Song has {} violation(s); run `discpack normalize` to fix them",
            "FAILED".red().bold(),
            result.violations.len()
        );
        Ok(ExitCode::from(1))
    }
}

/// Prints one line per violation.
pub(crate) fn print_violations(result: &ValidationResult) {
    for violation in &result.violations {
        println!("  {} {}", "x".red(), violation);
    }
}

/// Run validate with machine-readable JSON output
fn run_json(song_path: &str, config_path: Option<&str>) -> Result<ExitCode> {
    let config = match load_config(config_path.map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            let error = input_error_to_json(&e, config_path.unwrap_or_default());
            return fail(vec![error]);
        }
    };
    let LoadResult { song, source_hash } = match load_song(Path::new(song_path)) {
        Ok(loaded) => loaded,
        Err(e) => return fail(vec![input_error_to_json(&e, song_path)]),
    };

    let result = validate_song(&song, &config);
    let output = ValidateOutput {
        success: result.is_ok(),
        errors: result.violations.iter().map(violation_to_json).collect(),
        source_hash: Some(source_hash),
    };
    print_json(&output)?;

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn fail(errors: Vec<JsonError>) -> Result<ExitCode> {
    print_json(&ValidateOutput {
        success: false,
        errors,
        source_hash: None,
    })?;
    Ok(ExitCode::from(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use discpack_spec::{Note, Song};

    fn write_song(dir: &tempfile::TempDir, filename: &str, song: &Song) -> String {
        let path = dir.path().join(filename);
        std::fs::write(&path, song.to_json_pretty().unwrap()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn validate_playable_song_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        let song = Song::new("ok", 4, vec![Note::new(0, 0, 45), Note::new(4, 1, 33)]);
        let path = write_song(&tmp, "ok.json", &song);

        assert_eq!(run(&path, None, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(&path, None, true).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn validate_reports_violations() {
        let tmp = tempfile::tempdir().unwrap();
        let song = Song::new("bad", 2000, vec![Note::new(0, 0, 90)]);
        let path = write_song(&tmp, "bad.json", &song);

        assert_eq!(run(&path, None, false).unwrap(), ExitCode::from(1));
        assert_eq!(run(&path, None, true).unwrap(), ExitCode::from(1));
    }

    #[test]
    fn validate_missing_file_fails() {
        assert!(run("/nonexistent/song.json", None, false).is_err());
        assert_eq!(
            run("/nonexistent/song.json", None, true).unwrap(),
            ExitCode::from(1)
        );
    }
}
