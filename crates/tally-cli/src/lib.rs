//! Station billing tracker CLI library.
//!
//! This crate provides the CLI interface for the station biller.

mod cli;
pub mod commands;
mod config;
mod session_io;

pub use cli::{AddKind, Cli, Commands, PresetAction};
pub use config::Config;
pub use session_io::Session;
