//! discpack Song Library
//!
//! This crate provides the song model, the machine configuration, and song
//! validation for discpack. A song is a tick-ordered list of notes; the
//! machine plays each instrument through a fixed number of modules, each with
//! a lower and an upper octave lane.
//!
//! # Example
//!
//! ```
//! use discpack_spec::{validate_song, Note, PackConfig, Song};
//!
//! let config = PackConfig::default();
//! let song = Song::new(
//!     "scale",
//!     4,
//!     vec![Note::new(0, 0, 45), Note::new(2, 0, 47), Note::new(4, 0, 49)],
//! );
//!
//! let result = validate_song(&song, &config);
//! assert!(result.is_ok());
//! ```
//!
//! # Modules
//!
//! - [`config`]: Machine configuration (instruments, pitch range, geometry)
//! - [`error`]: Violation and error types
//! - [`song`]: Song and note types
//! - [`validation`]: Song validation

pub mod config;
pub mod error;
pub mod song;
pub mod validation;

// Re-export commonly used types at the crate root
pub use config::{
    InstrumentConfig, KeepPolicy, OctaveLane, PackConfig, PitchRange, DEFAULT_BANK_PAGES,
    DEFAULT_MAX_SONG_LENGTH, DEFAULT_MIN_FILL, DEFAULT_PAGE_SIZE, DEFAULT_PLAYBACK_TEMPO,
    MAX_CONTAINER_SLOTS, OCTAVE,
};
pub use error::{ConfigError, SongError, ValidationResult, Violation, ViolationCode};
pub use song::{Note, Song, DEFAULT_TEMPO};
pub use validation::{lane_occupancy, validate_song};
