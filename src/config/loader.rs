// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::RawConfigFile;
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; merging with environment and
/// CLI overrides happens in [`RunConfig::resolve`](crate::config::RunConfig::resolve).
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Like [`load_from_path`], but a missing file yields the all-defaults
/// config. The file is optional; a present but broken file is still an error.
pub fn load_optional(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = ?path, "no config file; using built-in defaults");
        return Ok(RawConfigFile::default());
    }
    load_from_path(path)
}
