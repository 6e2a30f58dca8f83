//! CLI subcommand implementations.

pub mod bill;
pub mod control;
pub mod history;
pub mod preset;
pub mod rate;
pub mod station;
pub mod status;
pub mod util;
