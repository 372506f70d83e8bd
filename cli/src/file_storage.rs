//! Storage backend over a JSON object file.
//!
//! The file holds one flat object mapping storage keys to their raw string
//! values, the same shape a browser's web storage has. It is re-read on every
//! access so several CLI invocations can share it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use storagesync::{Storage, StorageError};

#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in the file; a missing file is an empty storage.
    pub fn entries(&self) -> Result<Map<String, Value>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(StorageError::Unavailable(format!("{}: {err}", self.path.display()))),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(StorageError::Operation(format!("{}: not a JSON object", self.path.display()))),
            Err(err) => Err(StorageError::Operation(format!("{}: {err}", self.path.display()))),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StorageError> {
        let rendered = serde_json::to_string_pretty(entries)
            .map_err(|err| StorageError::Operation(format!("{}: {err}", self.path.display())))?;
        fs::write(&self.path, rendered)
            .map_err(|err| StorageError::Unavailable(format!("{}: {err}", self.path.display())))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entries()?.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => Ok(Some(raw)),
            // Hand-edited files may hold JSON directly; pass it on as text.
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries()?;
        entries.insert(key.to_owned(), Value::String(value.to_owned()));
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), key, bytes = value.len(), "storage file updated");
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_storage_test.rs"]
mod tests;
