//! CLI argument definitions for the discpack command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// discpack - Pack note-block songs into shulker box containers
#[derive(Parser)]
#[command(name = "discpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Path to a machine configuration file (JSON); defaults to the reference machine
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output machine-readable JSON diagnostics (no colored output)
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check a song against the machine's constraints without changing it
    Validate {
        /// Path to the song file (JSON)
        #[arg(short, long)]
        song: String,
    },

    /// Make a song playable: drop custom notes, transpose, trim chords
    Normalize {
        /// Path to the song file (JSON)
        #[arg(short, long)]
        song: String,

        /// Halve the song's speed by keeping only even ticks
        #[arg(long)]
        compress: bool,

        /// Output file path (default: "<name> (Formatted).json" next to the song)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Pack a normalized song into a container layout
    Pack {
        /// Path to the song file (JSON)
        #[arg(short, long)]
        song: String,

        /// Output file path (default: "<slug>.layout.json" next to the song)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Normalize and pack a song in one run
    Create {
        /// Path to the song file (JSON)
        #[arg(short, long)]
        song: String,

        /// Halve the song's speed by keeping only even ticks
        #[arg(long)]
        compress: bool,

        /// Also write the normalized song
        #[arg(long)]
        keep_formatted: bool,

        /// Output file path for the layout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print or write the default machine configuration
    Config {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}
