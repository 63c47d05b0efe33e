//! Errors raised while reading or rewriting the catalog file

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Raw OS error number for "no space left on device" on Unix
const ENOSPC: i32 = 28;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot create catalog directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No permission to access catalog file '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Out of disk space while saving catalog to '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot read catalog file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot save catalog to '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file parsed as something other than an id → entry map
    #[error("Catalog file '{path}' is malformed: {details}")]
    InvalidFormat { path: PathBuf, details: String },

    /// Replacing the catalog with the freshly written temp file failed
    #[error("Cannot replace '{to}' with '{from}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Missing required fields: {}", fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    #[error("Cannot encode catalog as JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    /// Classify an I/O failure hit while writing `path`
    pub fn on_write(path: PathBuf, error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied {
                path,
                source: error,
            }
        } else if out_of_space(&error) {
            StorageError::DiskFull {
                path,
                source: error,
            }
        } else {
            StorageError::WriteError {
                path,
                source: error,
            }
        }
    }

    /// Classify an I/O failure hit while reading `path`
    pub fn on_read(path: PathBuf, error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied {
                path,
                source: error,
            }
        } else {
            StorageError::ReadError {
                path,
                source: error,
            }
        }
    }

    /// What the operator can do about it, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::InvalidFormat { .. } => Some(
                "Repair the JSON by hand or move the file aside; a missing catalog is recreated empty.",
            ),
            StorageError::PermissionDenied { .. } => {
                Some("Make the catalog file and its directory readable and writable by this user.")
            }
            StorageError::DiskFull { .. } => Some("Free some disk space, then retry."),
            StorageError::CreateDirectory { .. } => {
                Some("Point data_file at a directory you can write to.")
            }
            StorageError::Validation { .. } => {
                Some("Give a non-empty name, author, date and category.")
            }
            _ => None,
        }
    }
}

fn out_of_space(error: &io::Error) -> bool {
    error.raw_os_error() == Some(ENOSPC)
        || error.to_string().to_lowercase().contains("no space left")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
