use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default status line template
pub const DEFAULT_STATUS_FORMAT: &str = "{icon} {artist} :: {track}";

/// Status line configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Template used by `mw status` when no format is given
    pub format: String,

    /// Icons keyed by player identity, overriding the built-in ones
    pub icons: BTreeMap<String, String>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_STATUS_FORMAT.to_string(),
            icons: BTreeMap::new(),
        }
    }
}
