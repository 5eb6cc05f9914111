//! Layered configuration.
//!
//! Consolidates configuration from these tiers, lowest priority first:
//! 1. **Defaults** - built in
//! 2. **Project** - `./vaultboy.yaml`
//! 3. **User** - `~/.vaultboy/config.yaml`
//! 4. **Environment** - `VAULTBOY_OUTPUT`
//!
//! An explicit file (`--config` or `VAULTBOY_CONFIG_PATH`) replaces tiers 2
//! and 3. Command-line flags are applied on top by the binary.
//!
//! ## Environment Variables
//! - `VAULTBOY_CONFIG_PATH` - Explicit config file
//! - `VAULTBOY_USER_DIR` - User config dir (default: `~/.vaultboy`)
//! - `VAULTBOY_OUTPUT` - Default output path

mod loader;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use types::*;
