//! JSON catalog persistence
//!
//! Handles saving and loading the catalog file. Uses atomic writes (write to
//! temp file, then rename) so a crash mid-save never leaves a truncated file.
//!
//! Storage location: `media.json` in the working directory unless the
//! configuration points elsewhere.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::Entry;
use crate::storage::error::{StorageError, StorageResult};

/// Persistence layer for the catalog JSON document
#[derive(Debug)]
pub struct JsonPersistence {
    path: PathBuf,
}

impl JsonPersistence {
    /// Create a persistence handler for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the catalog file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Save all entries, replacing the file contents
    pub fn save(&self, entries: &[Entry]) -> StorageResult<()> {
        let bytes = encode_entries(entries)?;
        atomic_write(&self.path, &bytes)?;
        debug!(path = ?self.path, count = entries.len(), "Saved catalog");
        Ok(())
    }

    /// Load entries from disk
    ///
    /// Returns `None` if the file doesn't exist.
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load(&self) -> StorageResult<Option<Vec<Entry>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StorageError::on_read(self.path.clone(), e))?;

        let entries = decode_entries(&content).map_err(|details| StorageError::InvalidFormat {
            path: self.path.clone(),
            details,
        })?;

        debug!(path = ?self.path, count = entries.len(), "Loaded catalog");
        Ok(Some(entries))
    }

    /// Load the existing catalog or create an empty one
    pub fn load_or_create(&self) -> StorageResult<Vec<Entry>> {
        if let Some(entries) = self.load()? {
            return Ok(entries);
        }

        self.save(&[])?;
        Ok(Vec::new())
    }
}

/// Render entries as an id-keyed JSON object with four-space indentation
fn encode_entries(entries: &[Entry]) -> StorageResult<Vec<u8>> {
    let mut map = Map::new();
    for entry in entries {
        map.insert(entry.id.clone(), serde_json::to_value(entry)?);
    }

    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    Value::Object(map).serialize(&mut serializer)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse an id-keyed JSON object into entries, keeping file order
///
/// The map key wins over any `id` stored inside the value.
fn decode_entries(content: &str) -> Result<Vec<Entry>, String> {
    let map: Map<String, Value> = serde_json::from_str(content).map_err(|e| e.to_string())?;

    map.into_iter()
        .map(|(key, mut value)| {
            let Some(object) = value.as_object_mut() else {
                return Err(format!("entry '{}' is not an object", key));
            };
            object.insert("id".to_string(), Value::String(key.clone()));
            serde_json::from_value::<Entry>(value).map_err(|e| format!("entry '{}': {}", key, e))
        })
        .collect()
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let temp_path = temp_path_for(path);

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::on_write(temp_path.clone(), e))?;
    file.write_all(data)
        .map_err(|e| StorageError::on_write(temp_path.clone(), e))?;
    file.sync_all()
        .map_err(|e| StorageError::on_write(temp_path.clone(), e))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Sibling path the new contents are written to before the rename
///
/// `.tmp` is appended to the whole file name, so it never equals `path`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("catalog"));
    name.push(".tmp");
    path.with_file_name(name)
}
