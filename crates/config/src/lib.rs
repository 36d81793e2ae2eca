//! Configuration management for yukifiles.
//!
//! TOML configuration stored under the XDG config directory. Missing keys
//! are filled with defaults and written back on load.

mod settings;
mod xdg;

pub use settings::{Config, EditorSettings, LoggingSettings, UploadSettings};
pub use xdg::{get_cache_dir, get_config_dir};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default values as constants
pub mod defaults {
    pub const HISTORY_SIZE: usize = 1000;
    pub const REQUIRE_EXTENSION: bool = true;
    pub const UPLOAD_STEPS: u32 = 10;
    pub const UPLOAD_STEP_INTERVAL_MS: u64 = 100;
    pub const MIN_LOG_LEVEL: &str = "info";
    pub const MAX_LOG_ENTRIES: usize = 500;
    pub const LOG_FILE_NAME: &str = "yukifiles.log";
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// On first run, creates config file with default values.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if absent.
    ///
    /// Auto-completes missing keys with default values.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let original_content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::validate_content(&original_content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;

        // Serialize back to get normalized content
        let normalized_content = toml::to_string_pretty(&config)?;
        if original_content != normalized_content {
            config.save_to(path)?;
        }

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Log file path: the configured one, or `yukifiles.log` in the cache dir.
    pub fn log_file_path(&self) -> Result<PathBuf> {
        match &self.logging.file_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(get_cache_dir()?.join(defaults::LOG_FILE_NAME)),
        }
    }

    /// Validate config content.
    pub fn validate_content(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_creates_file_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_missing_keys_are_filled_and_written_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ncase_sensitive = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.search.case_sensitive);
        assert!(!config.search.whole_word);
        assert_eq!(config.editor.history_size, defaults::HISTORY_SIZE);
        assert_eq!(config.upload.steps, defaults::UPLOAD_STEPS);

        let rewritten = std::fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("history_size"));
        assert!(rewritten.contains("step_interval_ms"));
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.search.regex = true;
        config.upload.steps = 4;
        config.logging.min_level = "debug".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_content_is_an_error() {
        assert!(Config::validate_content("editor = 5").is_err());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[upload\nsteps = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_log_file_path_override() {
        let mut config = Config::default();
        config.logging.file_path = Some("/tmp/custom.log".to_string());
        assert_eq!(
            config.log_file_path().unwrap(),
            PathBuf::from("/tmp/custom.log")
        );
    }
}
