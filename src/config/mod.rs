pub mod path;
#[cfg(test)]
pub mod config_test;

use std::{io, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents all possible errors loading a [Config]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
}

/// Default interval between input report reads
pub const DEFAULT_POLL_RATE_MS: u64 = 1;
/// Default name of the virtual gamepad
pub const DEFAULT_VIRTUAL_DEVICE_NAME: &str = "Shanwan Gamepad";

/// Daemon configuration
#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    pub version: u32,
    /// Hidraw path of the gamepad to manage. If unset, the first attached
    /// gamepad is used.
    pub device_path: Option<String>,
    /// Milliseconds to sleep between reads of the device
    pub poll_rate_ms: u64,
    /// Enable force feedback support
    pub rumble: bool,
    /// Name of the virtual gamepad exposed through uinput
    pub virtual_device_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            device_path: None,
            poll_rate_ms: DEFAULT_POLL_RATE_MS,
            rumble: true,
            virtual_device_name: DEFAULT_VIRTUAL_DEVICE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load a [Config] from the given YAML string
    pub fn from_yaml(content: String) -> Result<Config, LoadError> {
        let config: Config = serde_yaml::from_str(content.as_str())?;
        Ok(config)
    }

    /// Load a [Config] from the given YAML file
    pub fn from_yaml_file<P>(path: P) -> Result<Config, LoadError>
    where
        P: AsRef<Path>,
    {
        let file = std::fs::File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Load the config from the given path, or from the first config file
    /// found in the search paths. Defaults are used if no config file exists.
    pub fn load(path: Option<&Path>) -> Result<Config, LoadError> {
        if let Some(path) = path {
            log::debug!("Loading config from {path:?}");
            return Self::from_yaml_file(path);
        }

        let Some(path) = path::find_config_path() else {
            log::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };
        log::debug!("Loading config from {path:?}");
        Self::from_yaml_file(path)
    }
}
