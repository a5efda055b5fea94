//! CLI command implementations

pub mod config;
pub mod create;
pub mod json_output;
pub mod normalize;
pub mod pack;
pub mod validate;

use anyhow::{Context, Result};
use discpack_backend::PackResult;
use discpack_spec::Song;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Prints a JSON document to stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}

/// Resolves an output path: the explicit one, or `file_name` next to the song.
pub(crate) fn output_path(song_path: &str, output: Option<&str>, file_name: &str) -> PathBuf {
    match output {
        Some(path) => PathBuf::from(path),
        None => Path::new(song_path)
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(file_name),
    }
}

/// Song title for file naming: the song's own name, or the file stem.
pub(crate) fn song_title(song: &Song, song_path: &str) -> String {
    if !song.name.trim().is_empty() {
        return song.name.clone();
    }
    Path::new(song_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("song")
        .to_string()
}

/// Writes a song as pretty JSON.
pub(crate) fn write_song(path: &Path, song: &Song) -> Result<()> {
    let json = song
        .to_json_pretty()
        .context("Failed to serialize song to JSON")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write song: {}", path.display()))
}

/// Writes a pack result (placements, hash and summary) as pretty JSON.
pub(crate) fn write_layout(path: &Path, result: &PackResult) -> Result<()> {
    let json =
        serde_json::to_string_pretty(result).context("Failed to serialize layout to JSON")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write layout: {}", path.display()))
}
