//! Configuration schema definitions and loading.
//!
//! The configuration is a single optional TOML file; every field has a
//! default so an empty or missing file is valid.

mod daemon;
mod loading;
mod paths;
mod status;

pub use daemon::DaemonConfig;
pub use paths::ConfigPaths;
pub use status::{DEFAULT_STATUS_FORMAT, StatusConfig};

use serde::{Deserialize, Serialize};

/// Main configuration structure for musicwand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Aggregator daemon settings.
    #[serde(default)]
    pub daemon: DaemonConfig,

    /// Status line settings.
    #[serde(default)]
    pub status: StatusConfig,
}
