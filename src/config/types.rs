//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tool configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Output path used when `-o` is not given.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub json: JsonConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            json: JsonConfig::default(),
        }
    }
}

/// JSON output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonConfig {
    /// Indent JSON output with two spaces.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("output.json")
}

fn default_pretty() -> bool {
    true
}
