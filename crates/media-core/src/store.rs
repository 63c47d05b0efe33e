//! Catalog store
//!
//! The `Store` owns the in-memory list of entries and the JSON file backing
//! it. Reads are served from memory; every mutation rewrites the whole file.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open("media.json")?;  // Creates or loads existing
//!
//! let entry = store.add(NewEntry::new("Dune", "Herbert", "01-01-1965", "Books"))?;
//! let books = store.get_by_category("books");
//! store.delete_by_id(&entry.id)?;
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Entry, NewEntry};
use crate::storage::{JsonPersistence, StorageError, StorageResult};

/// Catalog of media entries backed by a JSON file
///
/// Entries are kept in insertion order, which is also the file order.
#[derive(Debug)]
pub struct Store {
    entries: Vec<Entry>,
    persistence: JsonPersistence,
}

impl Store {
    /// Open the store at `path`, creating an empty catalog if none exists
    ///
    /// Fails if the file exists but is not a valid catalog.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let persistence = JsonPersistence::new(path);
        let entries = persistence.load_or_create()?;

        info!(
            path = ?persistence.path(),
            count = entries.len(),
            "Opened catalog"
        );

        Ok(Self {
            entries,
            persistence,
        })
    }

    /// Open the store at the configured data file
    pub fn open_with_config(config: &Config) -> StorageResult<Self> {
        Self::open(config.data_file.clone())
    }

    /// Re-read the catalog from disk, replacing the in-memory entries
    pub fn load(&mut self) -> StorageResult<()> {
        self.entries = self.persistence.load_or_create()?;
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.persistence.path()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order
    pub fn get_all(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Get an entry by id
    pub fn get_by_id(&self, id: &str) -> Option<Entry> {
        self.entries.iter().find(|e| e.id == id).cloned()
    }

    /// All entries whose category matches, ignoring case
    pub fn get_by_category(&self, category: &str) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|e| e.in_category(category))
            .cloned()
            .collect()
    }

    /// First entry (in insertion order) whose name matches, ignoring case
    pub fn get_by_name(&self, name: &str) -> Option<Entry> {
        self.entries.iter().find(|e| e.has_name(name)).cloned()
    }

    /// Validate and add a new entry, then persist the catalog
    ///
    /// Returns the stored entry with its assigned id. If saving fails the
    /// entry is dropped again so memory and disk stay in step.
    pub fn add(&mut self, new: NewEntry) -> StorageResult<Entry> {
        let missing = new.missing_fields();
        if !missing.is_empty() {
            return Err(StorageError::Validation { fields: missing });
        }

        let entry = Entry::from_new(self.fresh_id(), new);
        self.entries.push(entry.clone());

        if let Err(e) = self.persistence.save(&self.entries) {
            self.entries.pop();
            return Err(e);
        }

        debug!(id = %entry.id, name = %entry.name, "Added entry");
        Ok(entry)
    }

    /// Delete an entry by id, then persist the catalog
    ///
    /// Returns `false` without touching the file if no entry has that id.
    pub fn delete_by_id(&mut self, id: &str) -> StorageResult<bool> {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let removed = self.entries.remove(index);

        if let Err(e) = self.persistence.save(&self.entries) {
            self.entries.insert(index, removed);
            return Err(e);
        }

        debug!(id = %removed.id, "Deleted entry");
        Ok(true)
    }

    /// Generate an id not used by any current entry
    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.entries.iter().any(|e| e.id == id) {
                return id;
            }
        }
    }
}
