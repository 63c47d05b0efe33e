//! Storage layer
//!
//! Handles persistence of the catalog as a single JSON document.
//!
//! ## Format
//!
//! The file holds one JSON object mapping each entry id to the entry
//! itself, pretty-printed and in insertion order. Every save rewrites the
//! whole document through an atomic temp-file rename.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::JsonPersistence;
