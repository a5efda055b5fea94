//! Validation tests.

use super::*;
use crate::error::ViolationCode;
use pretty_assertions::assert_eq;

fn make_valid_song() -> Song {
    Song::new(
        "valid",
        10,
        vec![
            Note::new(0, 0, 33),
            Note::new(0, 0, 40),
            Note::new(0, 0, 44),
            Note::new(0, 0, 45),
            Note::new(4, 1, 57),
            Note::new(10, 15, 50),
        ],
    )
}

#[test]
fn test_valid_song() {
    let result = validate_song(&make_valid_song(), &PackConfig::default());
    assert!(result.is_ok(), "violations: {:?}", result.violations);
    assert!(result.into_result().is_ok());
}

#[test]
fn test_song_too_long() {
    let mut song = make_valid_song();
    song.length = 1458;
    let result = validate_song(&song, &PackConfig::default());
    assert_eq!(
        result.violations,
        vec![Violation::TooLong {
            length: 1458,
            max: 1457
        }]
    );
}

#[test]
fn test_max_length_is_allowed() {
    let mut song = make_valid_song();
    song.length = 1457;
    assert!(validate_song(&song, &PackConfig::default()).is_ok());
}

#[test]
fn test_notes_past_declared_length() {
    let song = Song::new(
        "short",
        5,
        vec![Note::new(0, 0, 45), Note::new(10, 0, 45), Note::new(12, 1, 40)],
    );
    let result = validate_song(&song, &PackConfig::default());
    assert_eq!(
        result.violations,
        vec![Violation::NotesPastEnd {
            count: 2,
            first_tick: 10,
            length: 5
        }]
    );
    assert!(result.violations[0].to_string().starts_with("V005"));
}

#[test]
fn test_note_on_last_tick_is_allowed() {
    let song = Song::new("exact", 10, vec![Note::new(10, 0, 45)]);
    assert!(validate_song(&song, &PackConfig::default()).is_ok());
}

#[test]
fn test_notes_out_of_order() {
    let mut song = make_valid_song();
    song.notes.push(Note::new(4, 2, 45));
    let result = validate_song(&song, &PackConfig::default());
    assert_eq!(
        result.violations,
        vec![Violation::NotesOutOfOrder {
            tick: 4,
            previous: 10
        }]
    );
}

#[test]
fn test_declared_custom_instruments() {
    let mut song = make_valid_song();
    song.custom_instruments.insert(16);
    let result = validate_song(&song, &PackConfig::default());
    assert_eq!(result.codes(), vec![ViolationCode::CustomInstrumentPresent]);
}

#[test]
fn test_notes_on_custom_instruments() {
    let mut song = make_valid_song();
    song.notes.push(Note::new(10, 20, 45));
    song.notes.push(Note::new(10, 16, 45));
    let result = validate_song(&song, &PackConfig::default());
    assert_eq!(
        result.violations,
        vec![Violation::CustomInstrumentsPresent {
            instruments: vec![16, 20]
        }]
    );
}

#[test]
fn test_note_out_of_range_counts_all() {
    let song = Song::new(
        "range",
        5,
        vec![
            Note::new(1, 0, 32),
            Note::new(2, 0, 58),
            Note::new(5, 0, 45),
        ],
    );
    let result = validate_song(&song, &PackConfig::default());
    assert_eq!(
        result.violations,
        vec![Violation::NoteOutOfRange {
            count: 2,
            first_tick: 1,
            first_key: 32
        }]
    );
}

#[test]
fn test_chord_cap_is_per_lane() {
    // piano has cap 3: three lower plus three upper is legal
    let song = Song::new(
        "lanes",
        0,
        vec![
            Note::new(0, 0, 33),
            Note::new(0, 0, 34),
            Note::new(0, 0, 35),
            Note::new(0, 0, 45),
            Note::new(0, 0, 46),
            Note::new(0, 0, 47),
        ],
    );
    assert!(validate_song(&song, &PackConfig::default()).is_ok());
}

#[test]
fn test_chord_too_large() {
    // double bass has cap 1
    let song = Song::new(
        "chord",
        3,
        vec![
            Note::new(3, 1, 33),
            Note::new(3, 1, 34),
            Note::new(3, 1, 50),
        ],
    );
    let result = validate_song(&song, &PackConfig::default());
    assert_eq!(
        result.violations,
        vec![Violation::ChordTooLarge {
            instrument: 1,
            tick: 3,
            lane: OctaveLane::Lower,
            size: 2,
            cap: 1
        }]
    );
}

#[test]
fn test_all_violations_are_reported() {
    let mut song = Song::new(
        "everything",
        2000,
        vec![
            Note::new(0, 1, 40),
            Note::new(0, 1, 41),
            Note::new(1, 0, 10),
            Note::new(2, 30, 45),
            Note::new(2100, 0, 45),
        ],
    );
    song.custom_instruments.insert(30);
    song.notes.push(Note::new(1, 2, 45));
    let result = validate_song(&song, &PackConfig::default());
    assert_eq!(result.codes(), ViolationCode::all().to_vec());
    assert_eq!(result.violations.len(), 6);
    assert!(result.into_result().is_err());
}

#[test]
fn test_zero_cap_instrument_rejects_any_note() {
    let mut config = PackConfig::default();
    config.instruments[2].polyphony_cap = 0;
    let song = Song::new("silent", 0, vec![Note::new(0, 2, 45)]);
    let result = validate_song(&song, &config);
    assert!(result.has(ViolationCode::ChordCapacityExceeded));
}

#[test]
fn test_lane_occupancy_counts() {
    let config = PackConfig::default();
    let chord = [
        Note::new(0, 0, 33),
        Note::new(0, 0, 45),
        Note::new(0, 0, 44),
        Note::new(0, 5, 45),
    ];
    let counts = lane_occupancy(&chord, &config);
    assert_eq!(counts.get(&(0, OctaveLane::Lower)), Some(&2));
    assert_eq!(counts.get(&(0, OctaveLane::Upper)), Some(&1));
    assert_eq!(counts.get(&(5, OctaveLane::Upper)), Some(&1));
    assert_eq!(counts.len(), 3);
}

#[test]
fn test_violation_display_has_code() {
    let violation = Violation::ChordTooLarge {
        instrument: 0,
        tick: 7,
        lane: OctaveLane::Upper,
        size: 4,
        cap: 3,
    };
    let message = violation.to_string();
    assert!(message.starts_with("V004"));
    assert!(message.contains("upper octave"));
    assert!(message.contains("tick 7"));
}
