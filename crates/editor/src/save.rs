//! Hand-off of edited content to whoever stores it.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use yukifiles_logger as logger;

use crate::FileKind;

/// Receives the content when a session is saved.
pub trait SaveTarget {
    fn save(&mut self, file_name: &str, content: &str, kind: FileKind) -> Result<()>;
}

impl<F> SaveTarget for F
where
    F: FnMut(&str, &str, FileKind) -> Result<()>,
{
    fn save(&mut self, file_name: &str, content: &str, kind: FileKind) -> Result<()> {
        self(file_name, content, kind)
    }
}

/// Writes saved files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn save(&mut self, file_name: &str, content: &str, kind: FileKind) -> Result<()> {
        let path = self.dir.join(file_name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        logger::info(format!(
            "Saved {} ({} file, {} bytes)",
            path.display(),
            kind,
            content.len()
        ));
        Ok(())
    }
}
