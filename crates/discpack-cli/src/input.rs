//! Input loading for songs and machine configurations.
//!
//! Both are JSON files. Loading returns the parsed value together with a
//! BLAKE3 hash of the source so reports can identify the exact input.

use discpack_spec::{PackConfig, Song};
use std::path::{Path, PathBuf};

/// Recognized song extensions.
pub const SONG_EXTENSIONS: &[&str] = &["json"];

/// Result of loading a song.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed song, notes in tick order.
    pub song: Song,
    /// BLAKE3 hash of the source file content (hex string).
    pub source_hash: String,
}

/// Errors that can occur while loading input files.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unknown file extension.
    UnknownExtension { extension: Option<String> },

    /// The file is not a well-formed song.
    MalformedInputFile { message: String },

    /// The configuration file is malformed or inconsistent.
    InvalidConfig { message: String },
}

impl InputError {
    /// Stable error code for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            InputError::FileRead { .. } => "CLI_001",
            InputError::UnknownExtension { .. } => "CLI_002",
            InputError::MalformedInputFile { .. } => "CLI_003",
            InputError::InvalidConfig { .. } => "CLI_004",
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::UnknownExtension { extension } => match extension {
                Some(ext) => write!(f, "unknown file extension '.{}' (expected .json)", ext),
                None => write!(f, "file has no extension (expected .json)"),
            },
            InputError::MalformedInputFile { message } => {
                write!(f, "malformed song file: {}", message)
            }
            InputError::InvalidConfig { message } => {
                write!(f, "invalid configuration: {}", message)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a song from a JSON file.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use discpack_cli::input::load_song;
///
/// let result = load_song(Path::new("song.json")).unwrap();
/// println!("Loaded {} notes", result.song.notes.len());
/// ```
pub fn load_song(path: &Path) -> Result<LoadResult, InputError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some(ext) if SONG_EXTENSIONS.contains(&ext) => {}
        _ => return Err(InputError::UnknownExtension { extension }),
    }

    let content = read(path)?;
    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();
    let song = Song::from_json(&content).map_err(|e| InputError::MalformedInputFile {
        message: e.to_string(),
    })?;

    Ok(LoadResult { song, source_hash })
}

/// Load the machine configuration, or the reference machine if no path is
/// given.
pub fn load_config(path: Option<&Path>) -> Result<PackConfig, InputError> {
    let Some(path) = path else {
        return Ok(PackConfig::default());
    };

    let content = read(path)?;
    PackConfig::from_json(&content).map_err(|e| InputError::InvalidConfig {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_song_sorts_notes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("song.json");
        std::fs::write(
            &path,
            r#"{"name":"t","length":4,"notes":[
                {"tick":4,"instrument":0,"key":40},
                {"tick":0,"instrument":1,"key":45}
            ]}"#,
        )
        .unwrap();

        let result = load_song(&path).unwrap();
        assert_eq!(result.song.notes[0].tick, 0);
        assert_eq!(result.song.notes[1].tick, 4);
        assert_eq!(result.source_hash.len(), 64);
    }

    #[test]
    fn load_song_rejects_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_song(&path).unwrap_err();
        assert!(matches!(err, InputError::MalformedInputFile { .. }));
        assert_eq!(err.code(), "CLI_003");
    }

    #[test]
    fn load_song_rejects_other_extensions() {
        let err = load_song(Path::new("song.nbs")).unwrap_err();
        assert!(err.to_string().contains(".nbs"));
    }

    #[test]
    fn load_song_missing_file() {
        let err = load_song(Path::new("/nonexistent/song.json")).unwrap_err();
        assert!(matches!(err, InputError::FileRead { .. }));
    }

    #[test]
    fn load_config_defaults_without_path() {
        assert_eq!(load_config(None).unwrap(), PackConfig::default());
    }

    #[test]
    fn load_config_rejects_inconsistent_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("machine.json");
        std::fs::write(&path, r#"{"page_size": 0}"#).unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, InputError::InvalidConfig { .. }));
    }
}
