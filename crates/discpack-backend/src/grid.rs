//! Container grid planning and note distribution.
//!
//! The grid holds, for every instrument, `polyphony_cap` modules with two
//! octave lanes each. A lane is one value per tick: `None` for silence or the
//! key's offset above the range minimum.

use discpack_spec::{OctaveLane, PackConfig, Song};
use tracing::debug;

use crate::error::PackError;

/// One value per tick.
pub type LaneValues = Vec<Option<u8>>;

/// One module: a lower and an upper lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    /// Lanes indexed by [`OctaveLane::index`].
    pub lanes: [LaneValues; 2],
}

impl ModuleGrid {
    fn empty(length: usize) -> Self {
        Self {
            lanes: [vec![None; length], vec![None; length]],
        }
    }

    /// Returns the lane values.
    pub fn lane(&self, lane: OctaveLane) -> &LaneValues {
        &self.lanes[lane.index()]
    }
}

/// All modules of one instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentGrid {
    /// Instrument id.
    pub id: u32,
    /// Instrument name.
    pub name: String,
    /// Modules, `polyphony_cap` of them.
    pub modules: Vec<ModuleGrid>,
}

/// Note values for the whole song, addressed by tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerGrid {
    /// Ticks per lane.
    pub adjusted_length: usize,
    /// Instruments in configuration order.
    pub instruments: Vec<InstrumentGrid>,
}

impl ContainerGrid {
    /// Total number of modules across instruments.
    pub fn module_count(&self) -> usize {
        self.instruments.iter().map(|i| i.modules.len()).sum()
    }
}

/// Allocates an empty grid for a song of `song_length`.
///
/// Fails if the padded length does not fit in two banks.
pub fn plan_grid(song_length: u32, config: &PackConfig) -> Result<ContainerGrid, PackError> {
    let adjusted_length = config.adjusted_length(song_length);
    if adjusted_length > config.tick_capacity() {
        return Err(PackError::BankCapacityExceeded {
            ticks: adjusted_length,
            capacity: config.tick_capacity(),
        });
    }

    let instruments = config
        .instruments
        .iter()
        .enumerate()
        .map(|(id, instrument)| InstrumentGrid {
            id: id as u32,
            name: instrument.name.clone(),
            modules: (0..instrument.polyphony_cap)
                .map(|_| ModuleGrid::empty(adjusted_length))
                .collect(),
        })
        .collect();

    debug!(song_length, adjusted_length, "planned grid");

    Ok(ContainerGrid {
        adjusted_length,
        instruments,
    })
}

/// Next free module per `(instrument, lane)` within a single tick.
struct ModuleCursor {
    next: Vec<[usize; 2]>,
}

impl ModuleCursor {
    fn new(instruments: usize) -> Self {
        Self {
            next: vec![[0; 2]; instruments],
        }
    }

    fn reset(&mut self) {
        self.next.fill([0; 2]);
    }

    /// Hands out the next module index for the lane.
    fn claim(&mut self, instrument: usize, lane: OctaveLane) -> usize {
        let slot = &mut self.next[instrument][lane.index()];
        let module = *slot;
        *slot += 1;
        module
    }
}

/// Builds the grid for a normalized song.
///
/// Each note goes to the first unused module of its instrument lane on its
/// tick, in the order notes appear within the tick. Notes must be in tick
/// order.
pub fn distribute(song: &Song, config: &PackConfig) -> Result<ContainerGrid, PackError> {
    let mut grid = plan_grid(song.length, config)?;
    let mut cursor = ModuleCursor::new(grid.instruments.len());
    let range = config.pitch_range;
    let mut last_tick = None;

    for (tick, chord) in song.chords() {
        if let Some(previous) = last_tick.filter(|&previous| tick <= previous) {
            return Err(PackError::NotesOutOfOrder { tick, previous });
        }
        last_tick = Some(tick);
        cursor.reset();

        if tick as usize >= grid.adjusted_length {
            return Err(PackError::TickOutOfBounds {
                tick,
                adjusted_length: grid.adjusted_length,
            });
        }

        for note in chord {
            let instrument = grid
                .instruments
                .get_mut(note.instrument as usize)
                .ok_or(PackError::UnknownInstrumentIndex {
                    instrument: note.instrument,
                    tick,
                })?;
            if !range.contains(note.key) {
                return Err(PackError::UnplayableNote {
                    key: note.key,
                    tick,
                });
            }

            let lane = range.lane_of(note.key);
            let module_index = cursor.claim(note.instrument as usize, lane);
            let module = instrument
                .modules
                .get_mut(module_index)
                .ok_or(PackError::ModuleOverflow {
                    instrument: note.instrument,
                    tick,
                    lane,
                })?;

            module.lanes[lane.index()][tick as usize] = Some((note.key - range.min) as u8);
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use discpack_spec::{InstrumentConfig, KeepPolicy, Note};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plan_grid_shape() {
        let config = PackConfig::default();
        let grid = plan_grid(730, &config).unwrap();
        assert_eq!(grid.adjusted_length, 733);
        assert_eq!(grid.instruments.len(), 16);
        assert_eq!(grid.instruments[0].modules.len(), 3);
        assert_eq!(grid.instruments[1].modules.len(), 1);
        assert_eq!(grid.module_count(), 3 * 4 + 12);
        for module in &grid.instruments[0].modules {
            assert_eq!(module.lanes[0].len(), 733);
            assert!(module.lanes[1].iter().all(Option::is_none));
        }
    }

    #[test]
    fn test_plan_grid_rejects_overlong_song() {
        let config = PackConfig::default();
        assert!(matches!(
            plan_grid(1458, &config),
            Err(PackError::BankCapacityExceeded {
                ticks: 1459,
                capacity: 1458
            })
        ));
    }

    #[test]
    fn test_distribute_assigns_first_free_module_per_lane() {
        let config = PackConfig::default();
        let song = Song::new(
            "d",
            2,
            vec![
                Note::new(0, 0, 33),
                Note::new(0, 0, 45),
                Note::new(0, 0, 40),
                Note::new(0, 0, 57),
                Note::new(2, 0, 44),
            ],
        );
        let grid = distribute(&song, &config).unwrap();
        let piano = &grid.instruments[0];

        assert_eq!(piano.modules[0].lane(OctaveLane::Lower)[0], Some(0));
        assert_eq!(piano.modules[1].lane(OctaveLane::Lower)[0], Some(7));
        assert_eq!(piano.modules[0].lane(OctaveLane::Upper)[0], Some(12));
        assert_eq!(piano.modules[1].lane(OctaveLane::Upper)[0], Some(24));
        assert_eq!(piano.modules[2].lane(OctaveLane::Lower)[0], None);
        // Cursor resets every tick
        assert_eq!(piano.modules[0].lane(OctaveLane::Lower)[2], Some(11));
        assert_eq!(piano.modules[0].lane(OctaveLane::Lower)[1], None);
    }

    #[test]
    fn test_distribute_keeps_instruments_apart() {
        let config = PackConfig::default();
        let song = Song::new("d", 0, vec![Note::new(0, 3, 45), Note::new(0, 4, 45)]);
        let grid = distribute(&song, &config).unwrap();
        assert_eq!(grid.instruments[3].modules[0].lane(OctaveLane::Upper)[0], Some(12));
        assert_eq!(grid.instruments[4].modules[0].lane(OctaveLane::Upper)[0], Some(12));
    }

    #[test]
    fn test_distribute_rejects_unknown_instrument() {
        let config = PackConfig::default();
        let song = Song::new("d", 0, vec![Note::new(0, 16, 45)]);
        assert!(matches!(
            distribute(&song, &config),
            Err(PackError::UnknownInstrumentIndex {
                instrument: 16,
                tick: 0
            })
        ));
    }

    #[test]
    fn test_distribute_rejects_overfull_lane() {
        let mut config = PackConfig::default();
        config.instruments = vec![InstrumentConfig::new("solo", 1, KeepPolicy::KeepLow)];
        let song = Song::new("d", 0, vec![Note::new(0, 0, 45), Note::new(0, 0, 46)]);
        assert!(matches!(
            distribute(&song, &config),
            Err(PackError::ModuleOverflow {
                lane: OctaveLane::Upper,
                ..
            })
        ));
    }

    #[test]
    fn test_distribute_rejects_unplayable_and_late_notes() {
        let config = PackConfig::default();
        let song = Song::new("d", 0, vec![Note::new(0, 0, 60)]);
        assert!(matches!(
            distribute(&song, &config),
            Err(PackError::UnplayableNote { key: 60, .. })
        ));

        // length 0 lays out 4 ticks
        let song = Song::new("d", 0, vec![Note::new(4, 0, 45)]);
        assert!(matches!(
            distribute(&song, &config),
            Err(PackError::TickOutOfBounds {
                tick: 4,
                adjusted_length: 4
            })
        ));
    }

    #[test]
    fn test_distribute_rejects_split_tick() {
        let config = PackConfig::default();
        let mut song = Song::new("d", 5, vec![Note::new(3, 0, 45), Note::new(5, 0, 45)]);
        // tick 3 again after tick 5 would reuse module 0 on tick 3
        song.notes.push(Note::new(3, 0, 47));

        assert!(matches!(
            distribute(&song, &config),
            Err(PackError::NotesOutOfOrder {
                tick: 3,
                previous: 5
            })
        ));
    }
}
