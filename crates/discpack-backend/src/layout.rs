//! Container layout tree.
//!
//! The layout is built bottom-up (slots, pages, containers, lane units) and
//! only turned into block text once, by [`crate::render`].

use discpack_spec::OctaveLane;
use serde::Serialize;

use crate::item::ItemDescriptor;

/// Horizontal space taken by one module (two side-by-side containers).
pub const MODULE_WIDTH: i32 = 2;

/// Depth of the container row.
pub const CONTAINER_Z: i32 = -1;

/// Depth of the label row.
pub const LABEL_Z: i32 = 0;

/// A block position relative to the layout origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// Creates a new position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Which half of a double container a bank is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Left,
    Right,
}

impl Orientation {
    /// Returns the orientation as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Left => "left",
            Orientation::Right => "right",
        }
    }
}

/// Contents of one page slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotItem {
    /// A note: the disc for `offset` semitones above the lane base.
    Pitch { offset: u8, item: ItemDescriptor },
    /// A silent tick.
    Filler { item: ItemDescriptor },
}

/// One tick inside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    /// Position within the page (0-based).
    pub index: u8,
    /// The item stored there.
    pub item: SlotItem,
}

/// A page: up to `page_size` consecutive ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based page number across both banks.
    pub number: u32,
    /// Position of the page within its bank (0-based).
    pub slot: u8,
    /// Slots in tick order.
    pub slots: Vec<Slot>,
}

/// One bank of pages placed as a container block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    /// Bank number (1 or 2).
    pub bank: u8,
    /// Half of the double container.
    pub orientation: Orientation,
    /// Block position.
    pub position: BlockPos,
    /// Pages in order.
    pub pages: Vec<Page>,
}

/// Identifying label placed in front of a lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Block position.
    pub position: BlockPos,
    /// Text lines, top to bottom.
    pub lines: Vec<String>,
}

/// What sits at a lane's positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaneContent {
    /// Both banks and the label.
    Present {
        label: Label,
        containers: [Container; 2],
    },
    /// Explicitly nothing; the positions stay reserved.
    Absent { positions: [BlockPos; 3] },
}

/// Output unit for one octave lane of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaneUnit {
    /// Which lane.
    pub lane: OctaveLane,
    /// Contents.
    pub content: LaneContent,
}

impl LaneUnit {
    /// Returns true if containers are emitted.
    pub fn is_present(&self) -> bool {
        matches!(self.content, LaneContent::Present { .. })
    }
}

/// Both lanes of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleLayout {
    /// 1-based module number within its instrument.
    pub number: usize,
    /// Lower lane then upper lane.
    pub lanes: [LaneUnit; 2],
}

/// All modules of one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentLayout {
    /// Instrument id.
    pub id: u32,
    /// Instrument name.
    pub name: String,
    /// Modules in order.
    pub modules: Vec<ModuleLayout>,
}

/// The complete container layout of a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerLayout {
    /// Ticks laid out per lane.
    pub adjusted_length: usize,
    /// Instruments in configuration order.
    pub instruments: Vec<InstrumentLayout>,
}

impl ContainerLayout {
    /// Iterates every lane unit in placement order.
    pub fn lane_units(&self) -> impl Iterator<Item = &LaneUnit> {
        self.instruments
            .iter()
            .flat_map(|i| i.modules.iter())
            .flat_map(|m| m.lanes.iter())
    }

    /// Total number of pages across all containers.
    pub fn page_count(&self) -> usize {
        self.lane_units()
            .map(|unit| match &unit.content {
                LaneContent::Present { containers, .. } => {
                    containers.iter().map(|c| c.pages.len()).sum()
                }
                LaneContent::Absent { .. } => 0,
            })
            .sum()
    }
}
