//! JSON output types for machine-readable CLI output.
//!
//! This module provides structured output types for the `--json` flag. Each
//! command prints exactly one JSON document to stdout.

use discpack_backend::{Notice, PackSummary};
use discpack_spec::Violation;
use serde::{Deserialize, Serialize};

use crate::input::InputError;

/// Error codes for CLI-level failures. Input errors use
/// [`InputError::code`], packing errors `PackError::code`.
pub mod error_codes {
    /// Output could not be written
    pub const WRITE_FAILED: &str = "CLI_005";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "V003", "PACK_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Converts an input error to a JSON error.
pub fn input_error_to_json(error: &InputError, file: &str) -> JsonError {
    JsonError::new(error.code(), error.to_string()).with_file(file)
}

/// Converts a song violation to a JSON error.
pub fn violation_to_json(violation: &Violation) -> JsonError {
    JsonError::new(violation.code().code(), violation.to_string())
}

/// JSON output for the `validate` command.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateOutput {
    /// Whether the song satisfies every constraint
    pub success: bool,
    /// Violations or load errors
    pub errors: Vec<JsonError>,
    /// BLAKE3 hash of the song file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

/// JSON output for the `normalize` command.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeOutput {
    /// Whether a normalized song was written
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Corrections applied to the song
    pub notices: Vec<Notice>,
    /// Where the normalized song was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

/// JSON output for the `pack` and `create` commands.
#[derive(Debug, Clone, Serialize)]
pub struct PackOutput {
    /// Whether a layout was written
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Corrections applied before packing (`create` only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
    /// Where the normalized song was written (`create --keep-formatted` only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_path: Option<String>,
    /// Where the layout was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// BLAKE3 hash of the placements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Layout counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PackSummary>,
}

impl PackOutput {
    /// Creates a failed pack output.
    pub fn failure(errors: Vec<JsonError>, notices: Vec<Notice>) -> Self {
        Self {
            success: false,
            errors,
            notices,
            formatted_path: None,
            output_path: None,
            hash: None,
            summary: None,
        }
    }
}
