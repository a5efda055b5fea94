//! Property-based tests for song validation and machine geometry.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p discpack-spec --test proptest_validation
//! ```

use proptest::prelude::*;

use discpack_spec::{validate_song, Note, OctaveLane, PackConfig, Song, Violation, ViolationCode};

// ============================================================================
// Strategies
// ============================================================================

fn arbitrary_notes() -> impl Strategy<Value = Vec<Note>> {
    prop::collection::vec((0u32..2000, 0u32..24, -100i32..200), 0..150).prop_map(|raw| {
        raw.into_iter()
            .map(|(tick, instrument, key)| Note::new(tick, instrument, key))
            .collect()
    })
}

// ============================================================================
// 1. Validation
// ============================================================================

proptest! {
    /// The range violation counts exactly the unplayable notes.
    #[test]
    fn range_violation_counts_unplayable_notes(notes in arbitrary_notes()) {
        let config = PackConfig::default();
        let expected = notes.iter().filter(|n| !config.pitch_range.contains(n.key)).count();
        let song = Song::new("p", 0, notes);

        let result = validate_song(&song, &config);
        let counted = result.violations.iter().find_map(|v| match v {
            Violation::NoteOutOfRange { count, .. } => Some(*count),
            _ => None,
        });
        prop_assert_eq!(counted.unwrap_or(0), expected);
    }

    /// Validation never reports a code twice except for chord violations,
    /// which are reported per lane and tick.
    #[test]
    fn song_level_codes_are_reported_once(notes in arbitrary_notes(), length in 0u32..3000) {
        let config = PackConfig::default();
        let song = Song::new("p", length, notes);
        let result = validate_song(&song, &config);

        for code in [
            ViolationCode::SongTooLong,
            ViolationCode::CustomInstrumentPresent,
            ViolationCode::NoteOutOfRange,
            ViolationCode::NoteBeyondLength,
            ViolationCode::NotesUnordered,
        ] {
            let n = result.violations.iter().filter(|v| v.code() == code).count();
            prop_assert!(n <= 1);
        }
        prop_assert_eq!(result.has(ViolationCode::SongTooLong), length > config.max_song_length);
        prop_assert_eq!(
            result.has(ViolationCode::NoteBeyondLength),
            song.notes.iter().any(|n| n.tick > length)
        );
        prop_assert!(!result.has(ViolationCode::NotesUnordered));
    }
}

// ============================================================================
// 2. Pitch range
// ============================================================================

proptest! {
    /// Wrapping lands in range and keeps the pitch class.
    #[test]
    fn wrap_keeps_pitch_class(key in -500i32..500) {
        let range = PackConfig::default().pitch_range;
        let wrapped = range.wrap(key);
        prop_assert!(range.contains(wrapped));
        prop_assert_eq!((wrapped - key).rem_euclid(12), 0);
        if range.contains(key) {
            prop_assert_eq!(wrapped, key);
        }
    }

    /// Keys below the octave boundary go to the lower lane.
    #[test]
    fn lane_split_at_boundary(key in 33i32..=57) {
        let range = PackConfig::default().pitch_range;
        let expected = if key < range.octave_boundary() {
            OctaveLane::Lower
        } else {
            OctaveLane::Upper
        };
        prop_assert_eq!(range.lane_of(key), expected);
    }
}

// ============================================================================
// 3. Adjusted length
// ============================================================================

proptest! {
    /// The last page is either empty or holds at least `min_fill` entries,
    /// and padding never exceeds what is needed.
    #[test]
    fn adjusted_length_fills_last_page(length in 0u32..1458) {
        let config = PackConfig::default();
        let adjusted = config.adjusted_length(length);
        let ticks = length as usize + 1;

        prop_assert!(adjusted >= ticks);
        prop_assert!(adjusted - ticks < config.min_fill);
        let remainder = adjusted % config.page_size;
        prop_assert!(remainder == 0 || remainder >= config.min_fill);
    }
}
