//! Song validation logic.
//!
//! Validation is read-only and reports every violation it finds instead of
//! stopping at the first one, so callers can print a complete diagnosis.

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{OctaveLane, PackConfig};
use crate::error::{ValidationResult, Violation};
use crate::song::{Note, Song};

/// Validates a song against a machine configuration.
///
/// # Arguments
/// * `song` - The song to check
/// * `config` - The machine the song must fit
///
/// # Returns
/// * `ValidationResult` with no violations if the song can be packed directly.
///
/// # Example
/// ```
/// use discpack_spec::{validate_song, Note, PackConfig, Song, ViolationCode};
///
/// let config = PackConfig::default();
/// let song = Song::new("demo", 2, vec![Note::new(0, 0, 45), Note::new(2, 0, 90)]);
///
/// let result = validate_song(&song, &config);
/// assert!(result.has(ViolationCode::NoteOutOfRange));
/// ```
pub fn validate_song(song: &Song, config: &PackConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_length(song, config, &mut result);
    validate_order(song, &mut result);
    validate_end(song, &mut result);
    validate_instruments(song, config, &mut result);
    validate_range(song, config, &mut result);
    validate_chords(song, config, &mut result);

    result
}

/// Validates the song length.
fn validate_length(song: &Song, config: &PackConfig, result: &mut ValidationResult) {
    if song.length > config.max_song_length {
        result.add(Violation::TooLong {
            length: song.length,
            max: config.max_song_length,
        });
    }
}

/// Validates that notes are in tick order.
fn validate_order(song: &Song, result: &mut ValidationResult) {
    if let Some(pair) = song.notes.windows(2).find(|pair| pair[1].tick < pair[0].tick) {
        result.add(Violation::NotesOutOfOrder {
            tick: pair[1].tick,
            previous: pair[0].tick,
        });
    }
}

/// Validates that no note lies past the declared length.
fn validate_end(song: &Song, result: &mut ValidationResult) {
    let mut past_end = song.notes.iter().filter(|note| note.tick > song.length);

    if let Some(first) = past_end.next() {
        result.add(Violation::NotesPastEnd {
            count: 1 + past_end.count(),
            first_tick: first.tick,
            length: song.length,
        });
    }
}

/// Flags declared custom instruments and notes played on them.
fn validate_instruments(song: &Song, config: &PackConfig, result: &mut ValidationResult) {
    let mut custom: BTreeSet<u32> = song.custom_instruments.clone();
    custom.extend(
        song.notes
            .iter()
            .map(|note| note.instrument)
            .filter(|id| !config.is_builtin(*id)),
    );

    if !custom.is_empty() {
        result.add(Violation::CustomInstrumentsPresent {
            instruments: custom.into_iter().collect(),
        });
    }
}

/// Validates that every key is playable.
fn validate_range(song: &Song, config: &PackConfig, result: &mut ValidationResult) {
    let range = config.pitch_range;
    let mut out_of_range = song.notes.iter().filter(|note| !range.contains(note.key));

    if let Some(first) = out_of_range.next() {
        result.add(Violation::NoteOutOfRange {
            count: 1 + out_of_range.count(),
            first_tick: first.tick,
            first_key: first.key,
        });
    }
}

/// Validates chord sizes per instrument and octave lane.
fn validate_chords(song: &Song, config: &PackConfig, result: &mut ValidationResult) {
    for (tick, chord) in song.chords() {
        for ((instrument, lane), size) in lane_occupancy(chord, config) {
            // Custom instruments are reported separately.
            let Some(instrument_config) = config.instrument(instrument) else {
                continue;
            };
            if size > instrument_config.polyphony_cap {
                result.add(Violation::ChordTooLarge {
                    instrument,
                    tick,
                    lane,
                    size,
                    cap: instrument_config.polyphony_cap,
                });
            }
        }
    }
}

/// Counts notes per `(instrument, lane)` within one chord.
pub fn lane_occupancy(chord: &[Note], config: &PackConfig) -> BTreeMap<(u32, OctaveLane), usize> {
    let mut counts = BTreeMap::new();
    for note in chord {
        let lane = config.pitch_range.lane_of(note.key);
        *counts.entry((note.instrument, lane)).or_insert(0) += 1;
    }
    counts
}
