//! Lane compaction: marks lanes that stay silent for the whole song.

use discpack_spec::OctaveLane;

use crate::grid::{ContainerGrid, LaneValues};

/// A lane after compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaneState {
    /// Every tick is empty; no container is emitted.
    Absent,
    /// At least one tick holds a note.
    Present(LaneValues),
}

impl LaneState {
    /// Returns true if the lane will be emitted.
    pub fn is_present(&self) -> bool {
        matches!(self, LaneState::Present(_))
    }
}

/// A module after compaction. Module position is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactModule {
    /// Lanes indexed by [`OctaveLane::index`].
    pub lanes: [LaneState; 2],
}

impl CompactModule {
    /// Returns the lane state.
    pub fn lane(&self, lane: OctaveLane) -> &LaneState {
        &self.lanes[lane.index()]
    }
}

/// All modules of one instrument after compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactInstrument {
    /// Instrument id.
    pub id: u32,
    /// Instrument name.
    pub name: String,
    /// Modules in their original order.
    pub modules: Vec<CompactModule>,
}

/// The grid after compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactGrid {
    /// Ticks per lane.
    pub adjusted_length: usize,
    /// Instruments in configuration order.
    pub instruments: Vec<CompactInstrument>,
}

impl CompactGrid {
    /// Number of lanes that will be emitted.
    pub fn present_lanes(&self) -> usize {
        self.lanes().filter(|lane| lane.is_present()).count()
    }

    /// Number of lanes replaced by an empty marker.
    pub fn absent_lanes(&self) -> usize {
        self.lanes().filter(|lane| !lane.is_present()).count()
    }

    fn lanes(&self) -> impl Iterator<Item = &LaneState> {
        self.instruments
            .iter()
            .flat_map(|i| i.modules.iter())
            .flat_map(|m| m.lanes.iter())
    }
}

fn compact_lane(values: LaneValues) -> LaneState {
    if values.iter().all(Option::is_none) {
        LaneState::Absent
    } else {
        LaneState::Present(values)
    }
}

/// Marks silent lanes as absent, keeping every other lane unchanged.
pub fn compact(grid: ContainerGrid) -> CompactGrid {
    let instruments = grid
        .instruments
        .into_iter()
        .map(|instrument| CompactInstrument {
            id: instrument.id,
            name: instrument.name,
            modules: instrument
                .modules
                .into_iter()
                .map(|module| {
                    let [lower, upper] = module.lanes;
                    CompactModule {
                        lanes: [compact_lane(lower), compact_lane(upper)],
                    }
                })
                .collect(),
        })
        .collect();

    CompactGrid {
        adjusted_length: grid.adjusted_length,
        instruments,
    }
}
