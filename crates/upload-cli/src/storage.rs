//! File-backed key-value store
//!
//! Plays the part of the browser's durable storage: a JSON object on disk
//! that survives between runs, so `stored` (and anything else acting as
//! the next page) can read what `upload` wrote.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};
use upload_core::{KeyValueStore, StorageError};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read one key, reporting an unreadable store instead of hiding it
    pub fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| StorageError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| StorageError::Unavailable(format!("{}: {}", self.path.display(), e)))
    }

    /// Replace the whole file; readers see either the old or the new object
    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_err = |e: std::io::Error| StorageError::Write(e.to_string());

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let content =
            serde_json::to_vec_pretty(values).map_err(|e| StorageError::Write(e.to_string()))?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(&content).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)?;
        debug!("Wrote {} to {}", key, self.path.display());
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.load(key).unwrap_or_else(|e| {
            warn!("{}", e);
            None
        })
    }
}
