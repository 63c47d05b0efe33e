//! Data models for the media catalog
//!
//! Defines the catalog `Entry` and the `NewEntry` payload used to create one.

use serde::{Deserialize, Serialize};

/// Names of the fields every entry must carry, in display order
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "author", "date", "category"];

/// One catalog record (book, movie, magazine, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// Unique identifier, assigned by the store
    pub id: String,
    /// Title of the work
    pub name: String,
    /// Author, director or publisher
    pub author: String,
    /// Release date, expected as DD-MM-YYYY (kept as free text)
    pub date: String,
    /// Category such as "Books"; compared case-insensitively
    pub category: String,
}

impl Entry {
    /// Build a stored entry from a creation payload and an assigned id
    pub fn from_new(id: impl Into<String>, new: NewEntry) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            author: new.author,
            date: new.date,
            category: new.category,
        }
    }

    /// Case-insensitive category match
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Case-insensitive name match
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Fields supplied when creating an entry
///
/// Missing fields deserialize as empty strings so that validation can report
/// them together instead of failing on the first absent key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
}

impl NewEntry {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            date: date.into(),
            category: category.into(),
        }
    }

    /// Names of required fields that are empty or whitespace only
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let values = [&self.name, &self.author, &self.date, &self.category];
        REQUIRED_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect()
    }

    /// Whether all required fields are present
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
