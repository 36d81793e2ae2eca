//! File kind detection and file name validation.

use std::fmt;
use thiserror::Error;

/// Kind of file, detected from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileKind {
    #[default]
    Text,
    Code,
    Audio,
    Image,
    Video,
    Database,
    Archive,
}

const AUDIO: &[&str] = &["mp3", "wav", "flac", "aac", "ogg", "m4a"];
const IMAGE: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp", "bmp"];
const VIDEO: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "webm", "mkv"];
const DATABASE: &[&str] = &["db", "sqlite", "sqlite3", "sql"];
const ARCHIVE: &[&str] = &["zip", "rar", "7z", "tar", "gz"];
const CODE: &[&str] = &[
    "js", "ts", "jsx", "tsx", "html", "css", "scss", "py", "java", "cpp", "c", "php", "rb", "go",
    "rs", "swift", "kt",
];

impl FileKind {
    /// Detect kind from a file name. Unknown or missing extensions are text.
    pub fn detect(file_name: &str) -> Self {
        extension(file_name)
            .map(|ext| Self::from_extension(&ext.to_lowercase()))
            .unwrap_or_default()
    }

    fn from_extension(ext: &str) -> Self {
        let table = [
            (AUDIO, FileKind::Audio),
            (IMAGE, FileKind::Image),
            (VIDEO, FileKind::Video),
            (DATABASE, FileKind::Database),
            (ARCHIVE, FileKind::Archive),
            (CODE, FileKind::Code),
        ];
        table
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, kind)| *kind)
            .unwrap_or(FileKind::Text)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Text => "text",
            FileKind::Code => "code",
            FileKind::Audio => "audio",
            FileKind::Image => "image",
            FileKind::Video => "video",
            FileKind::Database => "database",
            FileKind::Archive => "archive",
        }
    }

    /// Whether the text editor can open this kind
    pub fn is_editable(&self) -> bool {
        matches!(self, FileKind::Text | FileKind::Code)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Problem with a file name that blocks saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameIssue {
    #[error("file name is required")]
    Empty,
    #[error("file name contains invalid characters")]
    InvalidCharacters,
    #[error("file name should include an extension")]
    MissingExtension,
}

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Validate a file name. An empty result means the name is usable.
pub fn validate_file_name(name: &str, require_extension: bool) -> Vec<NameIssue> {
    let mut issues = Vec::new();
    let trimmed = name.trim();

    if trimmed.is_empty() {
        issues.push(NameIssue::Empty);
        return issues;
    }
    if name
        .chars()
        .any(|c| INVALID_CHARS.contains(&c) || c.is_control())
    {
        issues.push(NameIssue::InvalidCharacters);
    }
    if require_extension && extension(trimmed).is_none() {
        issues.push(NameIssue::MissingExtension);
    }
    issues
}

fn extension(file_name: &str) -> Option<&str> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}
