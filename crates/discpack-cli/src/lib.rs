//! discpack CLI library.
//!
//! This crate provides the core functionality for the discpack CLI,
//! including song and configuration loading, logging setup, and the
//! validate, normalize, pack, create and config commands.

pub mod commands;
pub mod input;
pub mod logging;
