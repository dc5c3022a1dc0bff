// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** resolve step
/// defaults or validate. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let raw: RawConfigFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load a configuration file and resolve it against the built-in defaults.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML (when the file exists).
/// - Merges `[step.*]` overrides onto the per-step defaults.
/// - Rejects unknown step names, empty commands and zero timeouts.
///
/// A missing file is not an error: the tool then runs with the stock
/// pipeline, the same way it would with an empty config.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "no config file found; using built-in defaults");
        return Ok(ConfigFile::default());
    }

    let raw = load_from_path(path)?;
    ConfigFile::try_from(raw)
}

/// Default config path: `Questgate.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Questgate.toml")
}
