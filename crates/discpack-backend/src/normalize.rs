//! Song normalization.
//!
//! Turns an arbitrary song into one the machine can play: custom-instrument
//! notes are dropped, keys are moved into range by whole octaves, oversized
//! chords are trimmed per instrument and octave lane, and the song is
//! optionally compressed to half speed. Normalization is total; every
//! destructive correction is reported once as a run-level [`Notice`].

use std::borrow::Cow;
use std::collections::BTreeMap;

use discpack_spec::{KeepPolicy, Note, OctaveLane, PackConfig, Song};
use serde::Serialize;
use tracing::{debug, info};

/// A destructive correction applied during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The input was longer than the machine allows.
    SongTooLong { length: u32, max: u32 },
    /// Notes on custom instruments were removed.
    CustomNotesRemoved { count: usize },
    /// Notes were moved into range by whole octaves.
    NotesTransposed { count: usize },
    /// Notes were removed from oversized chords.
    ChordNotesRemoved { count: usize },
    /// The end of the song was cut off.
    Truncated { first_dropped_tick: u32 },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::SongTooLong { length, max } => write!(
                f,
                "song length is {}, the maximum is {}; consider compressing it",
                length, max
            ),
            Notice::CustomNotesRemoved { count } => {
                write!(f, "removed {} note(s) using custom instruments", count)
            }
            Notice::NotesTransposed { count } => write!(
                f,
                "transposed {} note(s) outside the playable range",
                count
            ),
            Notice::ChordNotesRemoved { count } => write!(
                f,
                "removed {} note(s) from chords larger than allowed",
                count
            ),
            Notice::Truncated { first_dropped_tick } => write!(
                f,
                "song was too long; notes from tick {} on were cut off",
                first_dropped_tick
            ),
        }
    }
}

/// Result of normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOutcome {
    /// The playable song.
    pub song: Song,
    /// True if any chord had notes removed.
    pub chord_violation: bool,
    /// Corrections applied, at most one of each kind.
    pub notices: Vec<Notice>,
}

impl NormalizeOutcome {
    /// Returns true if the end of the song was cut off.
    pub fn truncated(&self) -> bool {
        self.notices
            .iter()
            .any(|n| matches!(n, Notice::Truncated { .. }))
    }
}

/// Result of trimming one chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordResolution {
    /// Surviving notes in their original order.
    pub kept: Vec<Note>,
    /// Number of notes removed.
    pub removed: usize,
}

/// Normalizes a song for the given machine.
///
/// # Arguments
/// * `song` - The input song
/// * `config` - The target machine
/// * `compress` - Keep only even ticks and halve them
///
/// # Example
/// ```
/// use discpack_backend::normalize::normalize;
/// use discpack_spec::{validate_song, Note, PackConfig, Song};
///
/// let config = PackConfig::default();
/// let song = Song::new("low", 0, vec![Note::new(0, 0, 10)]);
///
/// let outcome = normalize(&song, &config, false);
/// assert_eq!(outcome.song.notes[0].key, 34);
/// assert!(validate_song(&outcome.song, &config).is_ok());
/// ```
pub fn normalize(song: &Song, config: &PackConfig, compress: bool) -> NormalizeOutcome {
    let song: Cow<'_, Song> = if song.is_in_tick_order() {
        Cow::Borrowed(song)
    } else {
        debug!("restoring tick order");
        Cow::Owned(song.clone().into_tick_order())
    };

    let mut notices = Vec::new();
    if song.length > config.max_song_length {
        notices.push(Notice::SongTooLong {
            length: song.length,
            max: config.max_song_length,
        });
    }

    let mut notes = Vec::with_capacity(song.notes.len());
    let mut custom_removed = 0;
    let mut transposed = 0;
    let mut chord_removed = 0;
    let mut truncated_at = None;

    for (tick, chord) in song.chords() {
        if compress && tick % 2 != 0 {
            continue;
        }
        let new_tick = if compress { tick / 2 } else { tick };
        if new_tick > config.max_song_length {
            truncated_at = Some(tick);
            break;
        }

        let builtin: Vec<Note> = chord
            .iter()
            .filter(|note| config.is_builtin(note.instrument))
            .copied()
            .collect();
        custom_removed += chord.len() - builtin.len();

        let in_range: Vec<Note> = builtin
            .into_iter()
            .map(|mut note| {
                let key = config.pitch_range.wrap(note.key);
                if key != note.key {
                    transposed += 1;
                    note.key = key;
                }
                note
            })
            .collect();

        let resolution = resolve_chord_overflow(&in_range, config);
        if resolution.removed > 0 {
            debug!(tick, removed = resolution.removed, "trimmed chord");
        }
        chord_removed += resolution.removed;

        notes.extend(resolution.kept.into_iter().map(|mut note| {
            note.tick = new_tick;
            note.panning = 0;
            note.fine_pitch = 0;
            note
        }));
    }

    if custom_removed > 0 || !song.custom_instruments.is_empty() {
        notices.push(Notice::CustomNotesRemoved {
            count: custom_removed,
        });
    }
    if transposed > 0 {
        notices.push(Notice::NotesTransposed { count: transposed });
    }
    if chord_removed > 0 {
        notices.push(Notice::ChordNotesRemoved {
            count: chord_removed,
        });
    }
    if let Some(first_dropped_tick) = truncated_at {
        notices.push(Notice::Truncated { first_dropped_tick });
    }

    let normalized = Song {
        name: song.name.clone(),
        author: song.author.clone(),
        length: notes.last().map_or(0, |note| note.tick),
        tempo: config.playback_tempo,
        custom_instruments: Default::default(),
        notes,
    };

    info!(
        notes_in = song.notes.len(),
        notes_out = normalized.notes.len(),
        length = normalized.length,
        compress,
        "normalized song"
    );

    NormalizeOutcome {
        song: normalized,
        chord_violation: chord_removed > 0,
        notices,
    }
}

/// Trims one chord so no instrument lane exceeds its polyphony cap.
///
/// Notes are grouped by instrument and octave lane; each group is trimmed
/// independently with [`trim_group`]. Survivors keep their order in `chord`.
/// Notes on instruments missing from `config` are kept untouched.
pub fn resolve_chord_overflow(chord: &[Note], config: &PackConfig) -> ChordResolution {
    let mut groups: BTreeMap<(u32, OctaveLane), Vec<usize>> = BTreeMap::new();
    for (index, note) in chord.iter().enumerate() {
        let lane = config.pitch_range.lane_of(note.key);
        groups.entry((note.instrument, lane)).or_default().push(index);
    }

    let mut keep = vec![true; chord.len()];
    let mut removed = 0;
    for ((instrument, _), mut group) in groups {
        let Some(instrument_config) = config.instrument(instrument) else {
            continue;
        };
        let before = group.clone();
        removed += trim_group(
            &mut group,
            instrument_config.polyphony_cap,
            instrument_config.keep,
            |&index| chord[index].key,
        );
        for index in before {
            if !group.contains(&index) {
                keep[index] = false;
            }
        }
    }

    let kept = chord
        .iter()
        .zip(keep)
        .filter_map(|(note, keep)| keep.then_some(*note))
        .collect();

    ChordResolution { kept, removed }
}

/// Removes extreme notes from `group` until it holds at most `cap` items.
///
/// `KeepHigh` removes the current lowest key, `KeepLow` the current highest.
/// Among equal extremes the first in the group's current order goes.
/// Returns the number of items removed.
pub fn trim_group<T>(
    group: &mut Vec<T>,
    cap: usize,
    keep: KeepPolicy,
    key: impl Fn(&T) -> i32,
) -> usize {
    let mut removed = 0;
    while group.len() > cap {
        let mut victim = 0;
        for (index, item) in group.iter().enumerate().skip(1) {
            let candidate = key(item);
            let current = key(&group[victim]);
            let more_extreme = match keep {
                KeepPolicy::KeepHigh => candidate < current,
                KeepPolicy::KeepLow => candidate > current,
            };
            if more_extreme {
                victim = index;
            }
        }
        group.remove(victim);
        removed += 1;
    }
    removed
}
