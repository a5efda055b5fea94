//! Packing entry point.
//!
//! Runs a normalized song through distribution, compaction, serialization
//! and rendering, and returns the layout together with its placements.

use discpack_spec::{validate_song, PackConfig, Song};
use serde::Serialize;
use tracing::info;

use crate::compact::compact;
use crate::error::PackError;
use crate::grid::distribute;
use crate::layout::ContainerLayout;
use crate::render::{place, placement_hash, Placement};
use crate::serialize::serialize;

/// Suffix appended to the name of a normalized song.
pub const FORMATTED_SUFFIX: &str = " (Formatted)";

/// Extension of written layout files.
pub const LAYOUT_EXTENSION: &str = "layout.json";

/// Counts describing a packed song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackSummary {
    /// Ticks laid out per lane.
    pub adjusted_length: usize,
    /// Modules in the machine.
    pub modules: usize,
    /// Lanes holding containers.
    pub present_lanes: usize,
    /// Lanes left empty.
    pub absent_lanes: usize,
    /// Pages across all containers.
    pub pages: usize,
    /// Notes placed.
    pub notes: usize,
}

/// Result of packing a song.
#[derive(Debug, Clone, Serialize)]
pub struct PackResult {
    /// Song name.
    pub name: String,
    /// BLAKE3 hash of the placements.
    pub hash: String,
    /// Summary counts.
    pub summary: PackSummary,
    /// Typed layout tree.
    #[serde(skip)]
    pub layout: ContainerLayout,
    /// Blocks to place, in layout order.
    pub placements: Vec<Placement>,
}

/// Packs a song into containers.
///
/// The song must already satisfy the validator; otherwise
/// [`PackError::SongNotNormalized`] carries the violations.
///
/// # Example
/// ```
/// use discpack_backend::pack::pack_song;
/// use discpack_spec::{Note, PackConfig, Song};
///
/// let config = PackConfig::default();
/// let song = Song::new("scale", 2, vec![Note::new(0, 0, 45), Note::new(2, 0, 47)]);
///
/// let result = pack_song(&song, &config).unwrap();
/// assert_eq!(result.summary.present_lanes, 1);
/// assert_eq!(result.placements.len(), result.summary.modules * 2 * 3);
/// ```
pub fn pack_song(song: &Song, config: &PackConfig) -> Result<PackResult, PackError> {
    config.validate()?;

    let validation = validate_song(song, config);
    if !validation.is_ok() {
        return Err(PackError::SongNotNormalized {
            violations: validation.violations,
        });
    }

    let grid = distribute(song, config)?;
    let modules = grid.module_count();
    let compacted = compact(grid);
    let present_lanes = compacted.present_lanes();
    let absent_lanes = compacted.absent_lanes();
    let layout = serialize(&compacted, config)?;
    let placements = place(&layout);
    let hash = placement_hash(&placements);

    let summary = PackSummary {
        adjusted_length: layout.adjusted_length,
        modules,
        present_lanes,
        absent_lanes,
        pages: layout.page_count(),
        notes: song.notes.len(),
    };

    info!(
        song = %song.name,
        modules,
        present_lanes,
        pages = summary.pages,
        hash = %hash,
        "packed song"
    );

    Ok(PackResult {
        name: song.name.clone(),
        hash,
        summary,
        layout,
        placements,
    })
}

/// Name given to the normalized copy of a song.
pub fn formatted_name(name: &str) -> String {
    format!("{}{}", name, FORMATTED_SUFFIX)
}

/// File stem for a packed layout: lowercase, no parentheses, spaces as
/// underscores.
pub fn layout_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// File name for a packed layout.
pub fn layout_file_name(name: &str) -> String {
    format!("{}.{}", layout_slug(name), LAYOUT_EXTENSION)
}
