// src/config.rs

//! Configuration loading utilities.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load configuration from a TOML file.
///
/// A missing file yields the defaults. A file that exists but does not
/// parse is an error, so a typo never silently crawls with defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::info!(
            "No config file at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }
    let config = Config::load(path)?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
