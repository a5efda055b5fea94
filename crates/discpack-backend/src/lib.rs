//! discpack Backend - Song Normalization and Container Packing
//!
//! This crate turns note-block songs into containers for a disc-driven
//! playback machine. Every instrument gets a fixed number of modules; each
//! module has a lower and an upper octave lane, and each lane stores one item
//! per tick in pages (shulker boxes) spread over two banks (chests).
//!
//! # Pipeline
//!
//! 1. [`normalize`]: make an arbitrary song playable (drop custom-instrument
//!    notes, transpose into range, trim oversized chords, optional half-speed
//!    compression)
//! 2. [`grid`]: plan the container grid and distribute notes into modules
//! 3. [`compact`]: mark lanes that never play as absent
//! 4. [`serialize`]: address ticks into slots, pages and banks
//! 5. [`render`]: turn the layout into block placements
//!
//! [`pack::pack_song`] runs steps 2 to 5 on a song that passes validation.
//!
//! # Determinism
//!
//! Packing is a pure function of the song and the configuration. The same
//! inputs always produce the same placements and the same BLAKE3 hash.
//!
//! # Example
//!
//! ```
//! use discpack_backend::{normalize, pack_song};
//! use discpack_spec::{Note, PackConfig, Song};
//!
//! let config = PackConfig::default();
//! let song = Song::new("tune", 8, vec![Note::new(0, 0, 20), Note::new(8, 1, 70)]);
//!
//! let outcome = normalize(&song, &config, false);
//! let result = pack_song(&outcome.song, &config)?;
//! assert_eq!(result.hash.len(), 64);
//! # Ok::<(), discpack_backend::PackError>(())
//! ```

pub mod compact;
pub mod error;
pub mod grid;
pub mod item;
pub mod layout;
pub mod normalize;
pub mod pack;
pub mod render;
pub mod serialize;

// Re-export main types
pub use compact::{compact, CompactGrid, LaneState};
pub use error::PackError;
pub use grid::{distribute, plan_grid, ContainerGrid, LaneValues};
pub use item::{map_pitch, ItemDescriptor, FILLER_ITEM};
pub use layout::{BlockPos, ContainerLayout, LaneContent, LaneUnit};
pub use normalize::{normalize, resolve_chord_overflow, NormalizeOutcome, Notice};
pub use pack::{
    formatted_name, layout_file_name, layout_slug, pack_song, PackResult, PackSummary,
};
pub use render::{place, placement_hash, Placement, EMPTY_BLOCK};
pub use serialize::{address, decode_lane, serialize, TickAddress};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier.
pub const BACKEND_ID: &str = "discpack-backend";
