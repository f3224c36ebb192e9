//! Configuration for Daytally.
//!
//! ## config.kdl - User preferences
//!
//! Located at:
//! - System: `~/.config/daytally/config.kdl` (`DT_CONFIG_DIR` overrides the directory)
//! - Data dir: `<data-dir>/config.kdl`
//!
//! Contains:
//! - `owner` - Owner that tasks are scoped to
//! - `output-format` - "json" or "human"
//! - `default-points` - Points given to new tasks (1-3)
//! - `default-category` - Category given to new tasks
//!
//! ## Precedence
//!
//! CLI flag / env var > data-dir config > system config > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, DEFAULT_CATEGORY, DEFAULT_OWNER, Resolved, ResolvedConfig, ValueSource,
    resolve_config, resolve_layers,
};
pub use schema::{CONFIG_KEYS, DaytallyConfig, OutputFormat};

use std::fs;
use std::path::{Path, PathBuf};

use kdl::KdlDocument;

use crate::{Error, Result};

/// Environment variable naming the owner.
pub const OWNER_ENV: &str = "DT_OWNER";

/// Environment variable overriding the system config directory.
pub const CONFIG_DIR_ENV: &str = "DT_CONFIG_DIR";

/// Config file name, in both locations.
pub const CONFIG_FILE: &str = "config.kdl";

/// Path of the system config file, if a config directory can be determined.
pub fn system_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join(CONFIG_FILE));
        }
    }
    dirs::config_dir().map(|dir| dir.join("daytally").join(CONFIG_FILE))
}

/// Path of the config file inside a data directory.
pub fn data_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Read a config file. A missing file reads as an empty config.
pub fn read_config(path: &Path) -> Result<DaytallyConfig> {
    if !path.exists() {
        return Ok(DaytallyConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    Ok(DaytallyConfig::from_kdl(&doc))
}

/// Write a config file, creating its directory.
pub fn write_config(path: &Path, config: &DaytallyConfig) -> Result<()> {
    config.validate().map_err(Error::Config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config.to_kdl().to_string())?;
    tracing::debug!(path = %path.display(), "wrote config");
    Ok(())
}
