//! Machine configuration: instruments, pitch range, and container geometry.
//!
//! The configuration describes one physical playback machine. It is loaded
//! once per run and passed by reference into every pipeline stage; nothing in
//! the workspace reads it from global state.
//!
//! This module provides:
//! - `InstrumentConfig` with the per-instrument polyphony cap and keep policy
//! - `PitchRange` and `OctaveLane` for pitch placement
//! - `PackConfig`, the whole machine, with `Default` matching the reference build

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::ConfigError;

/// Longest song (in ticks) a double bank can hold.
pub const DEFAULT_MAX_SONG_LENGTH: u32 = 1457;

/// Minimum number of entries on the final page so the machine keeps running.
pub const DEFAULT_MIN_FILL: usize = 4;

/// Slots per page.
pub const DEFAULT_PAGE_SIZE: usize = 27;

/// Pages per bank.
pub const DEFAULT_BANK_PAGES: usize = 27;

/// Largest page size or bank page count; slot and page indices are one byte.
pub const MAX_CONTAINER_SLOTS: usize = 256;

/// Playback speed written into normalized songs, in ticks per second.
pub const DEFAULT_PLAYBACK_TEMPO: f32 = 5.0;

/// Width of the playable range in semitones.
pub const PITCH_RANGE_WIDTH: i32 = 24;

/// Semitones per octave lane.
pub const OCTAVE: i32 = 12;

/// Which notes survive when a chord is too large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeepPolicy {
    /// Keep the highest notes; the lowest are removed first.
    #[serde(rename = "high")]
    KeepHigh,
    /// Keep the lowest notes; the highest are removed first.
    #[serde(rename = "low")]
    KeepLow,
}

impl KeepPolicy {
    /// Returns the policy as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeepPolicy::KeepHigh => "high",
            KeepPolicy::KeepLow => "low",
        }
    }
}

/// One built-in instrument of the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Display name, also used on labels.
    pub name: String,
    /// Simultaneous notes per octave lane per tick. Zero means the
    /// instrument has no modules.
    pub polyphony_cap: usize,
    /// Chord reduction policy.
    pub keep: KeepPolicy,
}

impl InstrumentConfig {
    /// Creates a new instrument config.
    pub fn new(name: impl Into<String>, polyphony_cap: usize, keep: KeepPolicy) -> Self {
        Self {
            name: name.into(),
            polyphony_cap,
            keep,
        }
    }
}

/// One of the two 12-semitone channels of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OctaveLane {
    /// Offsets 0..=11 above the range minimum.
    Lower,
    /// Offsets 12 and above.
    Upper,
}

impl OctaveLane {
    /// Both lanes, lower first.
    pub const ALL: [OctaveLane; 2] = [OctaveLane::Lower, OctaveLane::Upper];

    /// Index into per-module lane arrays (0 = lower, 1 = upper).
    pub fn index(&self) -> usize {
        match self {
            OctaveLane::Lower => 0,
            OctaveLane::Upper => 1,
        }
    }

    /// Human-readable label text.
    pub fn label(&self) -> &'static str {
        match self {
            OctaveLane::Lower => "lower octave",
            OctaveLane::Upper => "upper octave",
        }
    }
}

/// Inclusive range of keys the machine can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchRange {
    /// Lowest playable key.
    pub min: i32,
    /// Highest playable key.
    pub max: i32,
}

impl PitchRange {
    /// Creates a new pitch range.
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Returns true if `key` is playable.
    pub fn contains(&self, key: i32) -> bool {
        self.min <= key && key <= self.max
    }

    /// First key of the upper octave lane.
    pub fn octave_boundary(&self) -> i32 {
        self.min + OCTAVE
    }

    /// Lane a key belongs to. Keys below the range count as lower.
    pub fn lane_of(&self, key: i32) -> OctaveLane {
        if key < self.octave_boundary() {
            OctaveLane::Lower
        } else {
            OctaveLane::Upper
        }
    }

    /// Moves `key` into the range by whole octaves.
    pub fn wrap(&self, key: i32) -> i32 {
        let mut key = key;
        while key < self.min {
            key += OCTAVE;
        }
        while key > self.max {
            key -= OCTAVE;
        }
        key
    }
}

impl Default for PitchRange {
    fn default() -> Self {
        Self::new(33, 57)
    }
}

impl fmt::Display for PitchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// The whole playback machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackConfig {
    /// Built-in instruments, indexed by note instrument id.
    pub instruments: Vec<InstrumentConfig>,
    /// Longest song accepted without compression or truncation.
    #[serde(default = "default_max_song_length")]
    pub max_song_length: u32,
    /// Playable keys.
    #[serde(default)]
    pub pitch_range: PitchRange,
    /// Minimum entries on the final page.
    #[serde(default = "default_min_fill")]
    pub min_fill: usize,
    /// Slots per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Pages per bank.
    #[serde(default = "default_bank_pages")]
    pub bank_pages: usize,
    /// Attach pitch-name annotations to pitch items.
    #[serde(default)]
    pub name_discs: bool,
    /// Tempo written into normalized songs.
    #[serde(default = "default_playback_tempo")]
    pub playback_tempo: f32,
}

fn default_max_song_length() -> u32 {
    DEFAULT_MAX_SONG_LENGTH
}

fn default_min_fill() -> usize {
    DEFAULT_MIN_FILL
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_bank_pages() -> usize {
    DEFAULT_BANK_PAGES
}

fn default_playback_tempo() -> f32 {
    DEFAULT_PLAYBACK_TEMPO
}

impl Default for PackConfig {
    fn default() -> Self {
        use KeepPolicy::{KeepHigh, KeepLow};

        let instruments = [
            ("piano", 3, KeepHigh),
            ("double bass", 1, KeepLow),
            ("bass drum", 1, KeepLow),
            ("snare drum", 1, KeepLow),
            ("click", 1, KeepLow),
            ("guitar", 3, KeepLow),
            ("flute", 3, KeepHigh),
            ("bell", 1, KeepLow),
            ("chime", 1, KeepLow),
            ("xylophone", 1, KeepLow),
            ("iron xylophone", 1, KeepLow),
            ("cow bell", 1, KeepLow),
            ("digeridoo", 1, KeepLow),
            ("bit", 1, KeepLow),
            ("banjo", 1, KeepLow),
            ("pling", 3, KeepHigh),
        ]
        .into_iter()
        .map(|(name, cap, keep)| InstrumentConfig::new(name, cap, keep))
        .collect();

        Self {
            instruments,
            max_song_length: DEFAULT_MAX_SONG_LENGTH,
            pitch_range: PitchRange::default(),
            min_fill: DEFAULT_MIN_FILL,
            page_size: DEFAULT_PAGE_SIZE,
            bank_pages: DEFAULT_BANK_PAGES,
            name_discs: false,
            playback_tempo: DEFAULT_PLAYBACK_TEMPO,
        }
    }
}

impl PackConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PackConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::JsonParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pitch_range.max - self.pitch_range.min != PITCH_RANGE_WIDTH {
            return Err(ConfigError::PitchRangeWidth {
                min: self.pitch_range.min,
                max: self.pitch_range.max,
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroCapacity { field: "page_size" });
        }
        if self.bank_pages == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "bank_pages",
            });
        }
        for (field, value) in [("page_size", self.page_size), ("bank_pages", self.bank_pages)] {
            if value > MAX_CONTAINER_SLOTS {
                return Err(ConfigError::CapacityTooLarge {
                    field,
                    value,
                    max: MAX_CONTAINER_SLOTS,
                });
            }
        }
        if self.min_fill > self.page_size {
            return Err(ConfigError::MinFillTooLarge {
                min_fill: self.min_fill,
                page_size: self.page_size,
            });
        }
        if self.instruments.is_empty() || self.instruments.len() > 255 {
            return Err(ConfigError::InstrumentCount(self.instruments.len()));
        }

        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if instrument.name.contains(['"', '\'', '\\']) {
                return Err(ConfigError::InstrumentName(instrument.name.clone()));
            }
            if !seen.insert(instrument.name.as_str()) {
                return Err(ConfigError::DuplicateInstrument(instrument.name.clone()));
            }
        }

        if self.adjusted_length(self.max_song_length) > self.tick_capacity() {
            return Err(ConfigError::SongLengthExceedsCapacity {
                max_song_length: self.max_song_length,
                capacity: self.tick_capacity(),
            });
        }

        Ok(())
    }

    /// Returns the config for a built-in instrument id.
    pub fn instrument(&self, id: u32) -> Option<&InstrumentConfig> {
        self.instruments.get(id as usize)
    }

    /// Returns true if `id` names a built-in instrument.
    pub fn is_builtin(&self, id: u32) -> bool {
        (id as usize) < self.instruments.len()
    }

    /// Ticks that fit in both banks.
    pub fn tick_capacity(&self) -> usize {
        self.page_size * self.bank_pages * 2
    }

    /// Number of ticks to lay out for a song of `song_length`.
    ///
    /// Ticks run from 0 to `song_length` inclusive. When the final page would
    /// hold fewer than `min_fill` entries it is padded up to `min_fill`.
    pub fn adjusted_length(&self, song_length: u32) -> usize {
        let ticks = song_length as usize + 1;
        let remainder = ticks % self.page_size;
        if (1..self.min_fill).contains(&remainder) {
            ticks + (self.min_fill - remainder)
        } else {
            ticks
        }
    }
}
