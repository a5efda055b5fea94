//! Song model: timed notes plus song metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::SongError;

/// Tempo assumed for songs that do not declare one, in ticks per second.
pub const DEFAULT_TEMPO: f32 = 10.0;

/// Velocity assumed for notes that do not declare one.
pub const DEFAULT_VELOCITY: u8 = 100;

fn default_tempo() -> f32 {
    DEFAULT_TEMPO
}

fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

/// A single note event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// Tick the note plays on.
    pub tick: u32,
    /// Index into the built-in instrument list; anything past the end is a
    /// custom instrument.
    pub instrument: u32,
    /// Raw key value.
    pub key: i32,
    /// Editor layer the note sits on.
    #[serde(default)]
    pub layer: u32,
    /// Note volume (0-100).
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    /// Stereo panning (-100..=100).
    #[serde(default)]
    pub panning: i32,
    /// Fine pitch offset in cents.
    #[serde(default)]
    pub fine_pitch: i32,
}

impl Note {
    /// Creates a note with default playback details.
    pub fn new(tick: u32, instrument: u32, key: i32) -> Self {
        Self {
            tick,
            instrument,
            key,
            layer: 0,
            velocity: DEFAULT_VELOCITY,
            panning: 0,
            fine_pitch: 0,
        }
    }

    /// Sets the layer on this note.
    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }
}

/// A song: notes ordered by tick, stable within a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Song title.
    #[serde(default)]
    pub name: String,
    /// Song author.
    #[serde(default)]
    pub author: String,
    /// Last tick of the song.
    pub length: u32,
    /// Playback speed in ticks per second.
    #[serde(default = "default_tempo")]
    pub tempo: f32,
    /// Custom instrument ids declared by the song file.
    #[serde(default)]
    pub custom_instruments: BTreeSet<u32>,
    /// All notes, tick-ascending.
    pub notes: Vec<Note>,
}

impl Song {
    /// Creates a song, ordering the notes by tick.
    pub fn new(name: impl Into<String>, length: u32, notes: Vec<Note>) -> Self {
        let mut song = Self {
            name: name.into(),
            author: String::new(),
            length,
            tempo: DEFAULT_TEMPO,
            custom_instruments: BTreeSet::new(),
            notes,
        };
        song.sort_notes();
        song
    }

    /// Parses a song from JSON. Notes are put in tick order.
    pub fn from_json(json: &str) -> Result<Self, SongError> {
        let mut song: Song = serde_json::from_str(json)?;
        song.sort_notes();
        Ok(song)
    }

    /// Serializes the song as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, SongError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stable sort by tick; notes sharing a tick keep their order.
    fn sort_notes(&mut self) {
        self.notes.sort_by_key(|note| note.tick);
    }

    /// Returns true if no note comes before one with an earlier tick.
    ///
    /// `notes` is public, so a hand-built song can break the order that
    /// [`Song::new`] establishes.
    pub fn is_in_tick_order(&self) -> bool {
        self.notes.windows(2).all(|pair| pair[0].tick <= pair[1].tick)
    }

    /// Restores tick order, keeping the order of notes within a tick.
    pub fn into_tick_order(mut self) -> Self {
        self.sort_notes();
        self
    }

    /// Iterates chords: `(tick, notes on that tick)` in tick order.
    ///
    /// Notes are grouped while consecutive, so an unordered song yields the
    /// same tick more than once.
    pub fn chords(&self) -> impl Iterator<Item = (u32, &[Note])> {
        self.notes
            .chunk_by(|a, b| a.tick == b.tick)
            .map(|chord| (chord[0].tick, chord))
    }

    /// Tick of the last note, if any.
    pub fn last_tick(&self) -> Option<u32> {
        self.notes.last().map(|note| note.tick)
    }

    /// Returns true if the song has no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
