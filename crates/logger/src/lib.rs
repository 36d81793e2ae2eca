//! Logging infrastructure for yukifiles.
//!
//! A global logger that keeps the last entries in memory and appends every
//! entry to a log file. Calls made before [`init`] are dropped.

use chrono::Local;
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Timestamp in HH:MM:SS format
    pub timestamp: String,
    /// Message level
    pub level: LogLevel,
    /// Message text
    pub message: String,
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to string
    pub fn to_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

#[derive(Debug)]
struct Logger {
    /// Last `max_entries` messages
    entries: VecDeque<LogEntry>,
    max_entries: usize,
    min_level: LogLevel,
    /// None keeps the log in memory only
    file_path: Option<PathBuf>,
}

impl Logger {
    fn new(file_path: Option<PathBuf>, max_entries: usize, min_level: LogLevel) -> Self {
        if let Some(path) = &file_path {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }

            // One log per run
            if let Ok(mut file) = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
            {
                let _ = writeln!(file, "=== YukiFiles Log Start ===");
            }
        }

        Self {
            entries: VecDeque::new(),
            max_entries,
            min_level,
            file_path,
        }
    }

    fn add_entry(&mut self, level: LogLevel, message: String) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            level,
            message,
        };

        if let Some(path) = &self.file_path {
            if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) {
                let _ = writeln!(
                    file,
                    "[{}] {}: {}",
                    entry.timestamp,
                    level.to_str(),
                    entry.message
                );
            }
        }

        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }
}

/// Global logger instance that persists for the application lifetime.
static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

/// Initialize the global logger
///
/// Subsequent calls are ignored.
///
/// # Arguments
///
/// * `file_path` - Log file, truncated on init (`None` logs to memory only)
/// * `max_entries` - Maximum number of log entries to keep in memory
/// * `min_level` - Minimum log level to record
pub fn init(file_path: Option<PathBuf>, max_entries: usize, min_level: LogLevel) {
    LOGGER.get_or_init(|| Mutex::new(Logger::new(file_path, max_entries, min_level)));
}

fn with_logger<T>(f: impl FnOnce(&mut Logger) -> T) -> Option<T> {
    let mut logger = LOGGER.get()?.lock().ok()?;
    Some(f(&mut logger))
}

/// Set minimum log level dynamically
pub fn set_min_level(level: LogLevel) {
    with_logger(|logger| logger.min_level = level);
}

/// Log a message at `level`
pub fn log(level: LogLevel, message: impl Into<String>) {
    with_logger(|logger| logger.add_entry(level, message.into()));
}

/// Log a debug message
pub fn debug(message: impl Into<String>) {
    log(LogLevel::Debug, message);
}

/// Log an informational message
pub fn info(message: impl Into<String>) {
    log(LogLevel::Info, message);
}

/// Log a warning message
pub fn warn(message: impl Into<String>) {
    log(LogLevel::Warn, message);
}

/// Log an error message
pub fn error(message: impl Into<String>) {
    log(LogLevel::Error, message);
}

/// Get all log entries held in memory, oldest first
pub fn entries() -> Vec<LogEntry> {
    with_logger(|logger| logger.entries.iter().cloned().collect()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_level() {
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!(LogLevel::Debug < LogLevel::Error);
    }

    #[test]
    fn test_level_filter_and_ring_size() {
        let mut logger = Logger::new(None, 2, LogLevel::Info);
        logger.add_entry(LogLevel::Debug, "hidden".to_string());
        logger.add_entry(LogLevel::Info, "one".to_string());
        logger.add_entry(LogLevel::Warn, "two".to_string());
        logger.add_entry(LogLevel::Error, "three".to_string());

        let messages: Vec<_> = logger.entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_entries_are_written_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("test.log");

        let mut logger = Logger::new(Some(path.clone()), 10, LogLevel::Debug);
        logger.add_entry(LogLevel::Warn, "disk almost full".to_string());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("=== YukiFiles Log Start ==="));
        assert!(content.contains("WARN: disk almost full"));
    }

    #[test]
    fn test_global_logger() {
        // Only this test touches the global instance
        info("before init is dropped");
        init(None, 10, LogLevel::Info);

        debug("filtered out");
        info("saved file");
        set_min_level(LogLevel::Debug);
        debug("now visible");

        let messages: Vec<_> = entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["saved file", "now visible"]);
    }
}
