//! XDG Base Directory support for yukifiles.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "yukifiles";

/// Get the configuration directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME/yukifiles` or `~/.config/yukifiles`.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine config directory")
}

/// Get the cache directory following XDG conventions.
///
/// Only the log file is kept here; yukifiles has no other cached state.
///
/// Returns `$XDG_CACHE_HOME/yukifiles` or `~/.cache/yukifiles`.
pub fn get_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine cache directory")
}
