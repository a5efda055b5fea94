//! Error and violation types for song validation and configuration.

use thiserror::Error;

use crate::config::OctaveLane;

/// Violation codes reported by the song validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationCode {
    /// V001: Song is longer than the machine can hold
    SongTooLong,
    /// V002: Song uses custom (non built-in) instruments
    CustomInstrumentPresent,
    /// V003: Song contains notes outside the playable pitch range
    NoteOutOfRange,
    /// V004: A chord exceeds an instrument's polyphony cap in one octave lane
    ChordCapacityExceeded,
    /// V005: Notes lie past the declared song length
    NoteBeyondLength,
    /// V006: Notes are not in tick order
    NotesUnordered,
}

impl ViolationCode {
    /// Returns the violation code string (e.g., "V001").
    pub fn code(&self) -> &'static str {
        match self {
            ViolationCode::SongTooLong => "V001",
            ViolationCode::CustomInstrumentPresent => "V002",
            ViolationCode::NoteOutOfRange => "V003",
            ViolationCode::ChordCapacityExceeded => "V004",
            ViolationCode::NoteBeyondLength => "V005",
            ViolationCode::NotesUnordered => "V006",
        }
    }

    /// Returns all violation codes in report order.
    pub fn all() -> &'static [ViolationCode] {
        &[
            ViolationCode::SongTooLong,
            ViolationCode::CustomInstrumentPresent,
            ViolationCode::NoteOutOfRange,
            ViolationCode::ChordCapacityExceeded,
            ViolationCode::NoteBeyondLength,
            ViolationCode::NotesUnordered,
        ]
    }
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single reason why a song cannot be packed as-is.
///
/// Every variant is recoverable: the normalizer knows how to fix it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Song length exceeds the configured maximum.
    TooLong { length: u32, max: u32 },
    /// Notes reference instruments outside the built-in list, or the song
    /// declares custom instruments.
    CustomInstrumentsPresent { instruments: Vec<u32> },
    /// At least one note lies outside the playable pitch range.
    NoteOutOfRange {
        count: usize,
        first_tick: u32,
        first_key: i32,
    },
    /// Too many notes share one instrument and octave lane on one tick.
    ChordTooLarge {
        instrument: u32,
        tick: u32,
        lane: OctaveLane,
        size: usize,
        cap: usize,
    },
    /// Notes are placed after the song's last tick.
    NotesPastEnd {
        count: usize,
        first_tick: u32,
        length: u32,
    },
    /// A note comes before a note with a later tick.
    NotesOutOfOrder { tick: u32, previous: u32 },
}

impl Violation {
    /// Returns the stable code for this violation.
    pub fn code(&self) -> ViolationCode {
        match self {
            Violation::TooLong { .. } => ViolationCode::SongTooLong,
            Violation::CustomInstrumentsPresent { .. } => ViolationCode::CustomInstrumentPresent,
            Violation::NoteOutOfRange { .. } => ViolationCode::NoteOutOfRange,
            Violation::ChordTooLarge { .. } => ViolationCode::ChordCapacityExceeded,
            Violation::NotesPastEnd { .. } => ViolationCode::NoteBeyondLength,
            Violation::NotesOutOfOrder { .. } => ViolationCode::NotesUnordered,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::TooLong { length, max } => write!(
                f,
                "{}: song length {} exceeds the maximum of {}",
                self.code(),
                length,
                max
            ),
            Violation::CustomInstrumentsPresent { instruments } => write!(
                f,
                "{}: song contains custom instruments {:?}",
                self.code(),
                instruments
            ),
            Violation::NoteOutOfRange {
                count,
                first_tick,
                first_key,
            } => write!(
                f,
                "{}: {} note(s) outside the playable range (first: key {} at tick {})",
                self.code(),
                count,
                first_key,
                first_tick
            ),
            Violation::ChordTooLarge {
                instrument,
                tick,
                lane,
                size,
                cap,
            } => write!(
                f,
                "{}: chord of {} notes on instrument {} ({}) at tick {} exceeds cap {}",
                self.code(),
                size,
                instrument,
                lane.label(),
                tick,
                cap
            ),
            Violation::NotesPastEnd {
                count,
                first_tick,
                length,
            } => write!(
                f,
                "{}: {} note(s) after the song length {} (first at tick {})",
                self.code(),
                count,
                length,
                first_tick
            ),
            Violation::NotesOutOfOrder { tick, previous } => write!(
                f,
                "{}: note at tick {} follows a note at tick {}",
                self.code(),
                tick,
                previous
            ),
        }
    }
}

/// Result of song validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Every violation found, in report order.
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// Adds a violation to the result.
    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Returns true if the song can be packed directly.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns true if any violation carries the given code.
    pub fn has(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code() == code)
    }

    /// Distinct codes present, in report order.
    pub fn codes(&self) -> Vec<ViolationCode> {
        ViolationCode::all()
            .iter()
            .copied()
            .filter(|code| self.has(*code))
            .collect()
    }

    /// Converts to a Result, returning Err if there are violations.
    pub fn into_result(self) -> Result<(), Vec<Violation>> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }
}

/// Errors for song document handling.
#[derive(Debug, Error)]
pub enum SongError {
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors for an inconsistent machine configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The pitch range must span exactly two octaves.
    #[error("pitch range [{min}, {max}] must span exactly 24 semitones")]
    PitchRangeWidth { min: i32, max: i32 },

    /// Page size and bank page limit must be positive.
    #[error("{field} must be greater than zero")]
    ZeroCapacity { field: &'static str },

    /// Page size and bank page limit must fit a one-byte slot index.
    #[error("{field} is {value}, the maximum is {max}")]
    CapacityTooLarge {
        field: &'static str,
        value: usize,
        max: usize,
    },

    /// The minimum fill of the last page cannot exceed the page size.
    #[error("min_fill {min_fill} exceeds page size {page_size}")]
    MinFillTooLarge { min_fill: usize, page_size: usize },

    /// The longest allowed song does not fit in two banks.
    #[error("max_song_length {max_song_length} does not fit in {capacity} ticks")]
    SongLengthExceedsCapacity { max_song_length: u32, capacity: usize },

    /// Instrument names must be unique.
    #[error("duplicate instrument name: {0}")]
    DuplicateInstrument(String),

    /// Instrument names end up in quoted label text.
    #[error("instrument name {0:?} contains a quote or backslash")]
    InstrumentName(String),

    /// Instrument list is empty or too long.
    #[error("instrument count must be 1..=255, got {0}")]
    InstrumentCount(usize),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}
