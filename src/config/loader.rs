//! Configuration loader with tier-based merging.
//!
//! Each tier is flattened into dotted keys, the tiers are merged in priority
//! order with the same last-wins rule used for input files, and the result is
//! expanded back into a [`Config`]. A `null` in a tier means "not specified"
//! and leaves the lower tier's value in place.
//!
//! A project or user file that cannot be read, parsed, or merged into a valid
//! [`Config`] is skipped with a warning. An explicit file must load.

use super::types::Config;
use crate::error::{ConvertError, ConvertResult};
use crate::flatten::{FlatMap, flatten};
use crate::formats::yaml::parse_yaml;
use crate::merge::merge_all;
use crate::unflatten::unflatten;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// Project-level config (`./vaultboy.yaml`)
    Project = 1,
    /// User-level config (`~/.vaultboy/config.yaml`)
    User = 2,
    /// Explicit config file (`--config` or `VAULTBOY_CONFIG_PATH`)
    Explicit = 3,
    /// Environment variables (highest priority)
    Environment = 4,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Explicit => write!(f, "explicit"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Locations of the configuration files.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Replaces the project and user tiers when set.
    pub explicit: Option<PathBuf>,
    pub project_file: Option<PathBuf>,
    pub user_file: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        let explicit = std::env::var("VAULTBOY_CONFIG_PATH").ok().map(PathBuf::from);

        // User dir: VAULTBOY_USER_DIR or ~/.vaultboy
        let user_file = std::env::var("VAULTBOY_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".vaultboy")))
            .map(|dir| dir.join("config.yaml"));

        Self {
            explicit,
            project_file: Some(PathBuf::from("vaultboy.yaml")),
            user_file,
        }
    }

    /// Create paths with explicit project and user files.
    pub fn with_files(project_file: Option<PathBuf>, user_file: Option<PathBuf>) -> Self {
        Self {
            explicit: None,
            project_file,
            user_file,
        }
    }

    /// Use a single explicit config file instead of the project and user tiers.
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }
}

/// Loads and merges configuration tiers.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Config,
    /// Files that contributed, lowest tier first.
    sources: Vec<(ConfigTier, PathBuf)>,
}

impl ConfigLoader {
    /// Load configuration with explicit paths.
    pub fn load_with_paths(paths: ConfigPaths) -> ConvertResult<Self> {
        let mut tiers: Vec<Value> = Vec::new();
        let mut sources = Vec::new();

        let defaults = serde_json::to_value(Config::default()).map_err(ConvertError::serialize)?;
        tiers.push(defaults);

        if let Some(path) = paths.explicit {
            // An explicit file must load; a broken one is an error, not a skip.
            tiers.push(read_tier(&path)?);
            sources.push((ConfigTier::Explicit, path));
        } else {
            for (tier, path) in [
                (ConfigTier::Project, paths.project_file),
                (ConfigTier::User, paths.user_file),
            ] {
                let Some(path) = path else { continue };
                if !path.exists() {
                    continue;
                }
                match read_checked_tier(&tiers, &path) {
                    Ok(value) => {
                        debug!(tier = %tier, path = %path.display(), "Loaded config file");
                        tiers.push(value);
                        sources.push((tier, path));
                    }
                    Err(e) => warn!(tier = %tier, "Skipping config file: {}", e),
                }
            }
        }

        let mut config = merge_tiers(tiers)?;

        // Tier 4: Environment variable overrides
        Self::apply_env_overrides(&mut config);

        Ok(Self { config, sources })
    }

    /// Apply environment variable overrides to config.
    fn apply_env_overrides(config: &mut Config) {
        if let Ok(output) = std::env::var("VAULTBOY_OUTPUT") {
            debug!(tier = %ConfigTier::Environment, "VAULTBOY_OUTPUT overrides output");
            config.output = PathBuf::from(output);
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Config files that were applied, lowest priority first.
    pub fn sources(&self) -> &[(ConfigTier, PathBuf)] {
        &self.sources
    }
}

fn read_tier(path: &Path) -> ConvertResult<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
    parse_yaml(&content, path)
}

/// Read a tier and check that it merges cleanly onto the tiers below it.
fn read_checked_tier(lower: &[Value], path: &Path) -> ConvertResult<Value> {
    let value = read_tier(path)?;
    let mut candidate = lower.to_vec();
    candidate.push(value.clone());
    merge_tiers(candidate)?;
    Ok(value)
}

fn merge_tiers(tiers: Vec<Value>) -> ConvertResult<Config> {
    let flat_tiers = tiers.into_iter().map(|tier| {
        flatten(tier, "")
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .collect::<FlatMap>()
    });
    let merged = unflatten(merge_all(flat_tiers))?;
    serde_json::from_value(merged).map_err(|e| ConvertError::parse("configuration", e))
}
