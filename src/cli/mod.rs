//! Command-line interface of the `mw` binary.
//!
//! Client commands go through the aggregator daemon unless `--player`
//! names a player directly; `mw daemon` runs the aggregator itself.

/// Command implementations
pub mod commands;
/// Target player resolution and daemon autostart
pub mod connect;
pub mod formatting;
mod service;
mod types;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use service::CliService;
pub use types::{CliError, CommandResult};

/// Magically control your local media players.
#[derive(Debug, Parser)]
#[command(name = "mw", version, about, long_about = None)]
pub struct Cli {
    /// Talk to the player whose bus name ends with this suffix instead of the daemon
    #[arg(long, global = true)]
    pub player: Option<String>,

    /// Path to the configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start playback
    #[command(visible_alias = "y")]
    Play,

    /// Pause playback
    #[command(visible_alias = "u")]
    Pause,

    /// Toggle between playing and paused
    #[command(visible_alias = "p")]
    PlayPause,

    /// Skip to the next track
    #[command(visible_alias = "n")]
    Next,

    /// Go back to the previous track
    #[command(visible_aliases = ["prev", "v"])]
    Previous,

    /// Stop playback
    #[command(visible_alias = "s")]
    Stop,

    /// Open a URI in the player
    #[command(visible_alias = "o")]
    Open {
        /// URI to open
        uri: String,
    },

    /// Print the metadata of the current track
    Metadata {
        /// Print a JSON object instead of tab separated lines
        #[arg(long)]
        json: bool,
    },

    /// Print a formatted status line
    Status {
        /// Template with {icon}, {artist}, {album}, {track}, {length} and {position}
        #[arg(short, long)]
        format: Option<String>,

        /// Keep running and print a new line whenever the status changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Tail a log of property changes on every player
    Watch,

    /// Run the aggregator daemon in the foreground
    Daemon,

    /// Make the daemon forward to the named player
    Select {
        /// Bus name of the player, or any suffix of it
        name: String,
    },

    /// List the players known to the daemon
    Players,
}
