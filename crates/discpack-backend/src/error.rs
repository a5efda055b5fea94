//! Error type for packing.

use discpack_spec::{ConfigError, OctaveLane, Violation};
use thiserror::Error;

/// Error type for the packing pipeline.
///
/// All variants are fatal: the run stops and nothing is written.
#[derive(Debug, Error)]
pub enum PackError {
    /// The machine configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The song still has violations; it must be normalized first.
    #[error(
        "Song has {} violation(s) and cannot be packed; run `discpack normalize` on it first",
        .violations.len()
    )]
    SongNotNormalized { violations: Vec<Violation> },

    /// A note references an instrument the machine does not have.
    #[error("Unknown instrument index {instrument} at tick {tick}")]
    UnknownInstrumentIndex { instrument: u32, tick: u32 },

    /// A note key lies outside the playable range.
    #[error("Key {key} at tick {tick} is outside the playable range")]
    UnplayableNote { key: i32, tick: u32 },

    /// More notes than modules in one instrument lane on one tick.
    #[error("Instrument {instrument} has no free module in the {} at tick {tick}", .lane.label())]
    ModuleOverflow {
        instrument: u32,
        tick: u32,
        lane: OctaveLane,
    },

    /// A note lies past the end of the laid-out song.
    #[error("Note at tick {tick} lies past the song end ({adjusted_length} ticks)")]
    TickOutOfBounds { tick: u32, adjusted_length: usize },

    /// Notes are not in tick order, so one tick would be split.
    #[error("Note at tick {tick} follows a note at tick {previous}; notes must be in tick order")]
    NotesOutOfOrder { tick: u32, previous: u32 },

    /// The song does not fit into two banks.
    #[error("Song needs {ticks} ticks but the banks hold {capacity}")]
    BankCapacityExceeded { ticks: usize, capacity: usize },
}

impl PackError {
    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            PackError::Config(_) => "PACK_001",
            PackError::SongNotNormalized { .. } => "PACK_002",
            PackError::UnknownInstrumentIndex { .. } => "PACK_003",
            PackError::UnplayableNote { .. } => "PACK_004",
            PackError::ModuleOverflow { .. } => "PACK_005",
            PackError::TickOutOfBounds { .. } => "PACK_006",
            PackError::BankCapacityExceeded { .. } => "PACK_007",
            PackError::NotesOutOfOrder { .. } => "PACK_008",
        }
    }

    /// Error category for grouping.
    pub fn category(&self) -> &'static str {
        "pack"
    }
}
