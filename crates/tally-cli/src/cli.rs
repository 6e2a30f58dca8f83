//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Billing-by-time tracker for shared stations.
///
/// Runs countdown timers and count-up stopwatches per station, accrues cost
/// at a configurable rate, and banks the result into a billing history.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a new timer or stopwatch station.
    Add {
        #[command(subcommand)]
        kind: AddKind,
    },

    /// Start a station (resumes the same billing window after a pause).
    Start {
        /// Station name or id (prefix allowed).
        target: String,
    },

    /// Pause a running station.
    Pause {
        /// Station name or id (prefix allowed).
        target: String,
    },

    /// Settle a station's accrued cost into banked earnings and restart it
    /// from its initial state.
    Reset {
        /// Station name or id (prefix allowed).
        target: String,
    },

    /// Record a lap on a running stopwatch.
    Lap {
        /// Stopwatch name or id (prefix allowed).
        target: String,
    },

    /// Rename a station.
    Rename {
        /// Station name or id (prefix allowed).
        target: String,
        /// The new name.
        name: String,
    },

    /// Change a stopped timer's duration.
    SetDuration {
        /// Timer name or id (prefix allowed).
        target: String,
        /// New duration in seconds.
        seconds: i64,
    },

    /// Point a station at a game preset, or back at the default rate.
    Assign {
        /// Station name or id (prefix allowed).
        target: String,
        /// Preset name or id.
        #[arg(required_unless_present = "clear")]
        preset: Option<String>,
        /// Clear the assignment, going back to the default rate.
        #[arg(long, conflicts_with = "preset")]
        clear: bool,
    },

    /// Remove a station. Unbanked accrued cost on it is discarded.
    Rm {
        /// Station name or id (prefix allowed).
        target: String,
    },

    /// Show all stations, their live cost, and the billable total.
    Status {
        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Settle everything billable into a new history record. Running
    /// stations keep running; their billing windows restart at now.
    Bill,

    /// Show the billing history.
    History {
        /// Delete the entire billing history.
        #[arg(long, requires = "yes")]
        clear: bool,
        /// Confirm a destructive action.
        #[arg(long)]
        yes: bool,
    },

    /// Manage game pricing presets.
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Show or change the default billing rate.
    Rate {
        /// Cost charged per unit.
        #[arg(long)]
        cost: Option<f64>,
        /// Minutes per unit.
        #[arg(long)]
        minutes: Option<f64>,
    },
}

/// Station kinds that can be added.
#[derive(Debug, Subcommand)]
pub enum AddKind {
    /// A countdown timer. Defaults to one billing unit of the default rate.
    Timer {
        /// Station name (defaults to "Station N").
        name: Option<String>,
        /// Countdown duration in seconds.
        #[arg(long)]
        seconds: Option<i64>,
    },
    /// A count-up stopwatch.
    Stopwatch {
        /// Station name (defaults to "Stopwatch N").
        name: Option<String>,
    },
}

/// Preset management subcommands.
#[derive(Debug, Subcommand)]
pub enum PresetAction {
    /// List all presets.
    List,
    /// Create a preset.
    Add {
        /// Preset name.
        name: String,
        /// Cost charged per unit.
        #[arg(long)]
        cost: f64,
        /// Minutes per unit.
        #[arg(long)]
        minutes: f64,
    },
    /// Edit a preset's name or rate.
    Update {
        /// Preset name or id (prefix allowed).
        target: String,
        /// New preset name.
        #[arg(long)]
        name: Option<String>,
        /// New cost per unit.
        #[arg(long)]
        cost: Option<f64>,
        /// New minutes per unit.
        #[arg(long)]
        minutes: Option<f64>,
    },
    /// Delete a preset. Stations using it fall back to the default rate.
    Rm {
        /// Preset name or id (prefix allowed).
        target: String,
    },
}
