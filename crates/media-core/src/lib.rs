//! Media Catalog Core Library
//!
//! This crate provides the core functionality for the media catalog, a
//! personal list of books, movies and magazines kept in a single JSON file.
//!
//! # Architecture
//!
//! - **JSON file**: Source of truth, rewritten in full on every change
//!
//! All queries are served from the in-memory copy held by the `Store`.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open("media.json")?;
//!
//! // Add an entry
//! let entry = store.add(NewEntry::new("Dune", "Herbert", "01-01-1965", "Books"))?;
//!
//! // Query entries
//! let books = store.get_by_category("books");
//! ```
//!
//! # Modules
//!
//! - `store`: Catalog storage interface (main entry point)
//! - `models`: Entry data structures
//! - `storage`: JSON persistence and storage errors
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::{Entry, NewEntry, REQUIRED_FIELDS};
pub use storage::{JsonPersistence, StorageError, StorageResult};
pub use store::Store;
