//! Flat-file persistence for the patient collection.

mod document;

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// The whole persisted document: patient id → raw record, in file order.
pub type Collection = Map<String, Value>;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to replace data file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// JSON document store backed by a single file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Store at the given path. The file need not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
