//! Destinations for exported files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ExportError;

/// Receives a finished export, like a browser download would.
pub trait DownloadSink {
    fn download(&mut self, content: &str, file_name: &str) -> Result<(), ExportError>;
}

/// Writes downloads into a directory on disk.
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

impl DownloadSink for DirectorySink {
    fn download(&mut self, content: &str, file_name: &str) -> Result<(), ExportError> {
        let path = self.dir.join(file_name);
        fs::write(&path, content).map_err(|source| ExportError::FileCreate {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), bytes = content.len(), "export written");
        Ok(())
    }
}

/// Keeps downloads in memory as `(file name, content)` pairs.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub downloads: Vec<(String, String)>,
}

impl DownloadSink for MemorySink {
    fn download(&mut self, content: &str, file_name: &str) -> Result<(), ExportError> {
        self.downloads
            .push((file_name.to_string(), content.to_string()));
        Ok(())
    }
}
