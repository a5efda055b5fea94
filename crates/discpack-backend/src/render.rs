//! Block text rendering.
//!
//! Turns the layout tree into placements: a position plus the block state
//! string a structure tool would set there. Page containers are shulker
//! boxes nested inside double chests; labels are wall signs.

use serde::Serialize;

use crate::item::ItemDescriptor;
use crate::layout::{
    BlockPos, Container, ContainerLayout, Label, LaneContent, Page, Slot, SlotItem,
};

/// Block placed at positions reserved by an absent lane.
pub const EMPTY_BLOCK: &str = "minecraft:air";

/// One block to place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Where the block goes.
    pub pos: BlockPos,
    /// Block state with block entity data.
    pub block: String,
}

fn render_item(item: &ItemDescriptor) -> String {
    match item.name {
        Some(name) => format!(
            "\"{}\",tag:{{display:{{Name:'{{\"text\":\"{}\"}}'}}}}",
            item.id, name
        ),
        None => format!("\"{}\"", item.id),
    }
}

/// Renders one slot entry.
pub fn render_slot(slot: &Slot) -> String {
    let item = match &slot.item {
        SlotItem::Pitch { item, .. } | SlotItem::Filler { item } => item,
    };
    format!("{{Count:1b,Slot:{}b,id:{}}}", slot.index, render_item(item))
}

/// Renders a page as a named shulker box item.
pub fn render_page(page: &Page) -> String {
    let items = page
        .slots
        .iter()
        .map(render_slot)
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{{Count:1b,Slot:{slot}b,id:\"minecraft:shulker_box\",tag:{{BlockEntityTag:{{CustomName:'{{\"text\":\"{number}\"}}',Items:[{items}],id:\"minecraft:shulker_box\"}},display:{{Name:'{{\"text\":\"{number}\"}}'}}}}}}",
        slot = page.slot,
        number = page.number,
        items = items,
    )
}

/// Renders a bank as one half of a south-facing double chest.
pub fn render_container(container: &Container) -> String {
    let pages = container
        .pages
        .iter()
        .map(render_page)
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "minecraft:chest[facing=south,type={}]{{Items:[{}]}}",
        container.orientation.as_str(),
        pages
    )
}

/// Renders a label as a four-line wall sign.
///
/// Lines go in verbatim; `PackConfig::validate` keeps quotes and backslashes
/// out of instrument names.
pub fn render_label(label: &Label) -> String {
    let messages = (0..4)
        .map(|i| {
            let line = label.lines.get(i).map(String::as_str).unwrap_or("");
            format!("'{{\"text\":\"{}\"}}'", line)
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "minecraft:oak_wall_sign[facing=south,waterlogged=false]{{front_text:{{color:\"black\",has_glowing_text:0b,messages:[{}]}},is_waxed:0b}}",
        messages
    )
}

/// Flattens the layout into placements, in layout order.
///
/// Each lane contributes exactly three placements: both banks and the label,
/// or three empty blocks.
pub fn place(layout: &ContainerLayout) -> Vec<Placement> {
    let mut placements = Vec::new();

    for unit in layout.lane_units() {
        match &unit.content {
            LaneContent::Present { label, containers } => {
                for container in containers {
                    placements.push(Placement {
                        pos: container.position,
                        block: render_container(container),
                    });
                }
                placements.push(Placement {
                    pos: label.position,
                    block: render_label(label),
                });
            }
            LaneContent::Absent { positions } => {
                placements.extend(positions.iter().map(|pos| Placement {
                    pos: *pos,
                    block: EMPTY_BLOCK.to_string(),
                }));
            }
        }
    }

    placements
}

/// Content hash of a placement list.
pub fn placement_hash(placements: &[Placement]) -> String {
    let mut hasher = blake3::Hasher::new();
    for placement in placements {
        let BlockPos { x, y, z } = placement.pos;
        hasher.update(format!("{},{},{}={}\n", x, y, z, placement.block).as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{map_pitch, FILLER_ITEM};
    use crate::layout::Orientation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_slot() {
        let filler = Slot {
            index: 3,
            item: SlotItem::Filler { item: FILLER_ITEM },
        };
        assert_eq!(
            render_slot(&filler),
            r#"{Count:1b,Slot:3b,id:"minecraft:wooden_shovel"}"#
        );

        let disc = Slot {
            index: 0,
            item: SlotItem::Pitch {
                offset: 1,
                item: map_pitch(1, false).unwrap(),
            },
        };
        assert_eq!(
            render_slot(&disc),
            r#"{Count:1b,Slot:0b,id:"minecraft:music_disc_cat"}"#
        );
    }

    #[test]
    fn test_render_named_slot() {
        let disc = Slot {
            index: 5,
            item: SlotItem::Pitch {
                offset: 0,
                item: map_pitch(0, true).unwrap(),
            },
        };
        assert_eq!(
            render_slot(&disc),
            r#"{Count:1b,Slot:5b,id:"minecraft:music_disc_13",tag:{display:{Name:'{"text":"F#"}'}}}"#
        );
    }

    #[test]
    fn test_render_page_and_container() {
        let page = Page {
            number: 28,
            slot: 0,
            slots: vec![Slot {
                index: 0,
                item: SlotItem::Filler { item: FILLER_ITEM },
            }],
        };
        assert_eq!(
            render_page(&page),
            r#"{Count:1b,Slot:0b,id:"minecraft:shulker_box",tag:{BlockEntityTag:{CustomName:'{"text":"28"}',Items:[{Count:1b,Slot:0b,id:"minecraft:wooden_shovel"}],id:"minecraft:shulker_box"},display:{Name:'{"text":"28"}'}}}"#
        );

        let empty = Container {
            bank: 2,
            orientation: Orientation::Left,
            position: BlockPos::new(1, 0, -1),
            pages: Vec::new(),
        };
        assert_eq!(
            render_container(&empty),
            "minecraft:chest[facing=south,type=left]{Items:[]}"
        );
    }

    #[test]
    fn test_render_label() {
        let label = Label {
            position: BlockPos::new(0, 0, 0),
            lines: vec!["piano 2".to_string(), "lower octave".to_string()],
        };
        assert_eq!(
            render_label(&label),
            r#"minecraft:oak_wall_sign[facing=south,waterlogged=false]{front_text:{color:"black",has_glowing_text:0b,messages:['{"text":"piano 2"}','{"text":"lower octave"}','{"text":""}','{"text":""}']},is_waxed:0b}"#
        );
    }

    #[test]
    fn test_hash_depends_on_content() {
        let a = vec![Placement {
            pos: BlockPos::new(0, 0, 0),
            block: EMPTY_BLOCK.to_string(),
        }];
        let mut b = a.clone();
        assert_eq!(placement_hash(&a), placement_hash(&b));
        b[0].pos = BlockPos::new(1, 0, 0);
        assert_ne!(placement_hash(&a), placement_hash(&b));
        assert_eq!(placement_hash(&a).len(), 64);
    }
}
