//! Destinations for exported element files.

use std::path::{Path, PathBuf};

use elements::export::ExportFile;

#[cfg(test)]
#[path = "sink_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The filename would escape the target directory.
    #[error("refusing to write {0:?}: not a plain file name")]
    InvalidFilename(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Somewhere a synthesized file can be saved.
pub trait FileSink {
    /// Persist `file`.
    ///
    /// # Errors
    ///
    /// Implementation-specific write failures.
    fn save(&mut self, file: &ExportFile) -> Result<(), SinkError>;
}

/// Writes each file into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&mut self, file: &ExportFile) -> Result<(), SinkError> {
        let name = file.filename.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(SinkError::InvalidFilename(file.filename.clone()));
        }

        std::fs::create_dir_all(&self.dir).map_err(|source| SinkError::Io { path: self.dir.clone(), source })?;
        let path = self.dir.join(name);
        std::fs::write(&path, &file.content).map_err(|source| SinkError::Io { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), media_type = file.media_type.as_str(), "export written");
        Ok(())
    }
}

/// Collects files in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: Vec<ExportFile>,
}

impl FileSink for MemorySink {
    fn save(&mut self, file: &ExportFile) -> Result<(), SinkError> {
        self.files.push(file.clone());
        Ok(())
    }
}
