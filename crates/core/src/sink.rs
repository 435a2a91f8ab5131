//! Where generated files go.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, GenerateError};

/// Destination for rendered files. Paths are relative to the output root.
pub trait OutputSink {
    /// Called once before the first write.
    fn prepare(&mut self) -> Result<(), ConfigError>;

    fn write(&mut self, relative: &Path, content: &str) -> Result<(), GenerateError>;
}

/// Writes files below a root directory, creating directories as needed.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputSink for FsSink {
    fn prepare(&mut self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.root).map_err(|source| ConfigError::OutputDir {
            path: self.root.clone(),
            source,
        })
    }

    fn write(&mut self, relative: &Path, content: &str) -> Result<(), GenerateError> {
        let path = self.root.join(relative);
        let to_error = |source| GenerateError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(to_error)?;
        }
        fs::write(&path, content).map_err(to_error)?;

        debug!(path = %path.display(), bytes = content.len(), "Wrote file.");
        Ok(())
    }
}

/// Keeps written files in memory, ordered by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, relative: impl AsRef<Path>) -> Option<&str> {
        self.files.get(relative.as_ref()).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn prepare(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn write(&mut self, relative: &Path, content: &str) -> Result<(), GenerateError> {
        self.files
            .insert(relative.to_path_buf(), content.to_string());
        Ok(())
    }
}
