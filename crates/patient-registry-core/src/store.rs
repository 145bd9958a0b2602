//! Flat-file storage for the patient collection.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::models::{PatientFields, ValidationError};

/// The whole collection: id → stored fields.
pub type Collection = BTreeMap<String, PatientFields>;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid stored record {id}: {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: ValidationError,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Whole-file JSON store.
///
/// Every `load` reads the entire file and every `save` replaces it. The
/// replacement goes through a temp file in the same directory followed by a
/// rename, so readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Store backed by `path`. Does not touch the filesystem.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with an empty collection if it is missing.
    ///
    /// Returns `true` when a file was created.
    pub fn init(&self) -> StoreResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Collection::new())?;
        Ok(true)
    }

    /// Read and parse the entire collection.
    pub fn load(&self) -> StoreResult<Collection> {
        let raw = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the backing file with `collection`.
    pub fn save(&self, collection: &Collection) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(collection).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| self.io_error(source))?;
        tmp.write_all(&json)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|source| self.io_error(source))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
