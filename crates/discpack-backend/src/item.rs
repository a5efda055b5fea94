//! Pitch to item mapping.
//!
//! Each playable semitone of a lane is represented by one music disc. The
//! octave is not part of the item: it is implied by the lane the disc is
//! stored in.

use serde::Serialize;

/// Item stored in a slot for an empty tick.
pub const FILLER_ITEM: ItemDescriptor = ItemDescriptor {
    id: "minecraft:wooden_shovel",
    name: None,
};

/// Discs in lane-offset order, with their pitch names.
///
/// Offset 12 only occurs for the top key of the range, which sits on the
/// upper lane one octave above offset 0.
const PITCH_ITEMS: [(&str, &str); 13] = [
    ("minecraft:music_disc_13", "F#"),
    ("minecraft:music_disc_cat", "G"),
    ("minecraft:music_disc_blocks", "G#"),
    ("minecraft:music_disc_chirp", "A"),
    ("minecraft:music_disc_far", "A#"),
    ("minecraft:music_disc_mall", "B"),
    ("minecraft:music_disc_mellohi", "C"),
    ("minecraft:music_disc_stal", "C#"),
    ("minecraft:music_disc_strad", "D"),
    ("minecraft:music_disc_ward", "D#"),
    ("minecraft:music_disc_11", "E"),
    ("minecraft:music_disc_wait", "F"),
    ("minecraft:music_disc_pigstep", "F#"),
];

/// Number of distinct pitch items.
pub const PITCH_ITEM_COUNT: usize = PITCH_ITEMS.len();

/// An item placed into a page slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemDescriptor {
    /// Namespaced item id.
    pub id: &'static str,
    /// Optional display name annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
}

/// Position of a grid value within its own lane.
///
/// Values 0..=11 sit on the lower lane and map to themselves; upper lane
/// values drop one octave. For 0..=23 this is `value mod 12`.
pub fn lane_offset(value: u8) -> u8 {
    if value >= 12 {
        value - 12
    } else {
        value
    }
}

/// Maps a grid value (`key - range.min`) to the disc that plays it.
///
/// Returns `None` for values past the top of the range.
pub fn map_pitch(value: u8, named: bool) -> Option<ItemDescriptor> {
    let &(id, pitch_name) = PITCH_ITEMS.get(lane_offset(value) as usize)?;
    Some(ItemDescriptor {
        id,
        name: named.then_some(pitch_name),
    })
}

/// Inverse of [`map_pitch`] for a given item id: the lane offset it encodes.
pub fn offset_of_item(id: &str) -> Option<u8> {
    PITCH_ITEMS
        .iter()
        .position(|(item_id, _)| *item_id == id)
        .map(|offset| offset as u8)
}
