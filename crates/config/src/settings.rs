//! Configuration structures for yukifiles settings.

use serde::{Deserialize, Serialize};
use yukifiles_text_search::SearchOptions;

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Editor settings
    #[serde(default)]
    pub editor: EditorSettings,

    /// Default find/replace flags
    #[serde(default)]
    pub search: SearchOptions,

    /// Simulated upload progress
    #[serde(default)]
    pub upload: UploadSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Maximum number of undo steps kept per buffer
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Refuse to save files whose name has no extension
    #[serde(default = "default_require_extension")]
    pub require_extension: bool,
}

/// Simulated upload progress settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Number of progress steps
    #[serde(default = "default_upload_steps")]
    pub steps: u32,

    /// Delay between steps in ms
    #[serde(default = "default_upload_step_interval")]
    pub step_interval_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional, defaults to the cache directory)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,

    /// Number of entries kept in memory
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

// Default value functions for serde
fn default_history_size() -> usize {
    defaults::HISTORY_SIZE
}

fn default_require_extension() -> bool {
    defaults::REQUIRE_EXTENSION
}

fn default_upload_steps() -> u32 {
    defaults::UPLOAD_STEPS
}

fn default_upload_step_interval() -> u64 {
    defaults::UPLOAD_STEP_INTERVAL_MS
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

fn default_max_entries() -> usize {
    defaults::MAX_LOG_ENTRIES
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_size: default_history_size(),
            require_extension: default_require_extension(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            steps: default_upload_steps(),
            step_interval_ms: default_upload_step_interval(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
            max_entries: default_max_entries(),
        }
    }
}
