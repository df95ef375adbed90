use std::{fs, path::Path};

use tracing::debug;

use super::{Config, ConfigPaths};
use crate::{MusicwandError, Result};

impl Config {
    /// Loads the configuration from `path`, or from the default location.
    ///
    /// A missing file is not an error; the defaults are used instead.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed, or
    /// if no default location can be determined
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&ConfigPaths::main_config()?),
        }
    }

    /// Loads the configuration file at `path`, falling back to defaults if absent.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MusicwandError::toml_parse(e, Some(path)))
    }
}
