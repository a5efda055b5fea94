//! Container serialization.
//!
//! Ticks are addressed in a fixed radix: `page_size` slots per page,
//! `bank_pages` pages per bank, two banks per lane. The serializer walks each
//! present lane tick by tick and builds the typed layout tree.

use discpack_spec::{ConfigError, OctaveLane, PackConfig, MAX_CONTAINER_SLOTS};
use tracing::debug;

use crate::compact::{CompactGrid, LaneState};
use crate::error::PackError;
use crate::grid::LaneValues;
use crate::item::{lane_offset, map_pitch, offset_of_item, FILLER_ITEM};
use crate::layout::{
    BlockPos, Container, ContainerLayout, InstrumentLayout, Label, LaneContent, LaneUnit,
    ModuleLayout, Orientation, Page, Slot, SlotItem, CONTAINER_Z, LABEL_Z, MODULE_WIDTH,
};

/// Where a tick lives in the containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickAddress {
    /// Position within the page (0-based).
    pub slot: usize,
    /// Page number (1-based, across both banks).
    pub page: usize,
    /// Bank number (1 or 2).
    pub bank: u8,
}

/// Computes the container address of tick `t`.
pub fn address(t: usize, config: &PackConfig) -> TickAddress {
    let page = t / config.page_size + 1;
    TickAddress {
        slot: t % config.page_size,
        page,
        bank: if page <= config.bank_pages { 1 } else { 2 },
    }
}

/// Label text for a lane.
pub fn label_lines(instrument: &str, module_number: usize, lane: OctaveLane) -> Vec<String> {
    vec![
        format!("{} {}", instrument, module_number),
        lane.label().to_string(),
    ]
}

/// Narrows a slot or page index to the one byte a `Slot` tag holds.
fn container_index(index: usize, field: &'static str, value: usize) -> Result<u8, PackError> {
    u8::try_from(index).map_err(|_| {
        PackError::Config(ConfigError::CapacityTooLarge {
            field,
            value,
            max: MAX_CONTAINER_SLOTS,
        })
    })
}

/// Builds the pages of one lane, split into the two banks.
fn build_banks(
    values: &LaneValues,
    config: &PackConfig,
) -> Result<[Vec<Page>; 2], PackError> {
    let mut banks: [Vec<Page>; 2] = [Vec::new(), Vec::new()];
    let mut current = Vec::with_capacity(config.page_size);

    for (t, value) in values.iter().enumerate() {
        let addr = address(t, config);
        let item = match value {
            Some(value) => {
                let item = map_pitch(*value, config.name_discs).ok_or(
                    PackError::UnplayableNote {
                        key: config.pitch_range.min + i32::from(*value),
                        tick: t as u32,
                    },
                )?;
                SlotItem::Pitch {
                    offset: lane_offset(*value),
                    item,
                }
            }
            None => SlotItem::Filler { item: FILLER_ITEM },
        };
        current.push(Slot {
            index: container_index(addr.slot, "page_size", config.page_size)?,
            item,
        });

        if addr.slot == config.page_size - 1 || t == values.len() - 1 {
            if addr.page > config.bank_pages * 2 {
                return Err(PackError::BankCapacityExceeded {
                    ticks: values.len(),
                    capacity: config.tick_capacity(),
                });
            }
            banks[usize::from(addr.bank - 1)].push(Page {
                number: addr.page as u32,
                slot: container_index(
                    (addr.page - 1) % config.bank_pages,
                    "bank_pages",
                    config.bank_pages,
                )?,
                slots: std::mem::take(&mut current),
            });
        }
    }

    Ok(banks)
}

/// Serializes a compacted grid into the container layout.
///
/// Modules are placed left to right in configuration order, `MODULE_WIDTH`
/// apart; the lower lane sits at `y = 0` and the upper at `y = 1`. Absent
/// lanes still reserve their positions.
pub fn serialize(grid: &CompactGrid, config: &PackConfig) -> Result<ContainerLayout, PackError> {
    let mut offset = 0;
    let mut instruments = Vec::with_capacity(grid.instruments.len());

    for instrument in &grid.instruments {
        let mut modules = Vec::with_capacity(instrument.modules.len());

        for (index, module) in instrument.modules.iter().enumerate() {
            let number = index + 1;
            let [lower, upper] = OctaveLane::ALL.map(|lane| {
                serialize_lane(
                    module.lane(lane),
                    lane,
                    &instrument.name,
                    number,
                    offset,
                    config,
                )
            });
            modules.push(ModuleLayout {
                number,
                lanes: [lower?, upper?],
            });
            offset += MODULE_WIDTH;
        }

        instruments.push(InstrumentLayout {
            id: instrument.id,
            name: instrument.name.clone(),
            modules,
        });
    }

    debug!(
        modules = offset / MODULE_WIDTH,
        adjusted_length = grid.adjusted_length,
        "serialized layout"
    );

    Ok(ContainerLayout {
        adjusted_length: grid.adjusted_length,
        instruments,
    })
}

fn serialize_lane(
    state: &LaneState,
    lane: OctaveLane,
    instrument: &str,
    module_number: usize,
    x: i32,
    config: &PackConfig,
) -> Result<LaneUnit, PackError> {
    let y = lane.index() as i32;
    let label_pos = BlockPos::new(x, y, LABEL_Z);
    let first_pos = BlockPos::new(x, y, CONTAINER_Z);
    let second_pos = BlockPos::new(x + 1, y, CONTAINER_Z);

    let content = match state {
        LaneState::Absent => LaneContent::Absent {
            positions: [first_pos, second_pos, label_pos],
        },
        LaneState::Present(values) => {
            let [first, second] = build_banks(values, config)?;
            LaneContent::Present {
                label: Label {
                    position: label_pos,
                    lines: label_lines(instrument, module_number, lane),
                },
                containers: [
                    Container {
                        bank: 1,
                        orientation: Orientation::Right,
                        position: first_pos,
                        pages: first,
                    },
                    Container {
                        bank: 2,
                        orientation: Orientation::Left,
                        position: second_pos,
                        pages: second,
                    },
                ],
            }
        }
    };

    Ok(LaneUnit { lane, content })
}

/// Reads a lane back out of its containers: one value per tick.
///
/// Returns `None` if a slot holds an item that is not a pitch or filler.
pub fn decode_lane(containers: &[Container; 2], lane: OctaveLane) -> Option<LaneValues> {
    let base = lane.index() as u8 * 12;
    let mut values = Vec::new();

    for container in containers {
        for page in &container.pages {
            for slot in &page.slots {
                match slot.item {
                    SlotItem::Pitch { item, .. } => {
                        values.push(Some(offset_of_item(item.id)? + base));
                    }
                    SlotItem::Filler { item } if item == FILLER_ITEM => values.push(None),
                    SlotItem::Filler { .. } => return None,
                }
            }
        }
    }

    Some(values)
}
