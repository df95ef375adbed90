//! Musicwand - one stable MPRIS name in front of all your media players.
//!
//! The aggregator daemon claims `org.mpris.MediaPlayer2.musicwand`, keeps
//! track of which real player is current, and forwards every MPRIS call to
//! it. The `mw` binary controls players through the daemon, starting it on
//! demand.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use musicwand::services::{MprisClient, SessionTransport};
//!
//! # async fn example() -> musicwand::Result<()> {
//! let transport = SessionTransport::connect().await?;
//! let client = MprisClient::new(Arc::new(transport));
//!
//! for player in client.list_players().await? {
//!     println!("{} is {:?}", player.bus_name(), player.playback_status().await);
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface of the `mw` binary.
pub mod cli;

/// Configuration schema definitions and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Player client and aggregator daemon.
pub mod services;

/// Status line rendering.
pub mod status;

/// Logging setup for client commands and the daemon.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{MusicwandError, Result};
