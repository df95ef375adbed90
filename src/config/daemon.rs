use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::services::{aggregator::OnEmpty, mpris::BUS_NAME_PREFIX};

/// Aggregator daemon configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Suffix of the bus name the daemon claims under `org.mpris.MediaPlayer2.`
    pub service_suffix: String,

    /// What to do when no player exists at startup
    pub on_empty: OnEmpty,

    /// Bus name substrings of players the daemon never selects
    pub ignored_players: Vec<String>,

    /// How many times a client polls for a daemon it just started
    pub autostart_attempts: u32,

    /// Delay between two polls, in milliseconds
    pub autostart_interval_ms: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            service_suffix: "musicwand".to_string(),
            on_empty: OnEmpty::default(),
            ignored_players: Vec::new(),
            autostart_attempts: 3,
            autostart_interval_ms: 1000,
        }
    }
}

impl DaemonConfig {
    /// Full bus name claimed by the daemon
    pub fn service_name(&self) -> String {
        format!("{BUS_NAME_PREFIX}{}", self.service_suffix)
    }

    /// Delay between two autostart polls
    pub fn autostart_interval(&self) -> Duration {
        Duration::from_millis(self.autostart_interval_ms)
    }
}
