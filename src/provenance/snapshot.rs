// src/provenance/snapshot.rs

//! Local snapshot of an upstream listing
//!
//! The first successful fetch is written to disk as JSON. While the file
//! exists it is returned instead of fetching again; there is no expiry, delete
//! the file to refresh.

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the snapshot, if one has been stored
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if !self.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&self.path).map_err(|e| {
            Error::IoError(format!("Failed to read snapshot {}: {e}", self.path.display()))
        })?;
        let value = serde_json::from_str(&data).map_err(|e| {
            Error::ParseError(format!("Corrupt snapshot {}: {e}", self.path.display()))
        })?;
        Ok(Some(value))
    }

    /// Store a value, replacing any previous snapshot
    pub fn store<T: Serialize>(&self, value: &T) -> Result<()> {
        let data = serde_json::to_string(value)
            .map_err(|e| Error::ParseError(format!("Failed to serialize snapshot: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::IoError(format!("Failed to create directory {}: {e}", parent.display()))
            })?;
        }

        fs::write(&self.path, data).map_err(|e| {
            Error::IoError(format!("Failed to write snapshot {}: {e}", self.path.display()))
        })
    }

    /// Return the stored value, or fetch, store and return a fresh one
    pub fn load_or_fetch<T, F>(&self, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.load()? {
            info!("Using snapshot {}", self.path.display());
            return Ok(value);
        }

        let value = fetch()?;
        self.store(&value)?;
        debug!("Stored snapshot {}", self.path.display());
        Ok(value)
    }
}

/// Fetch through an optional snapshot
pub(crate) fn fetch_cached<T, F>(snapshot: Option<&Snapshot>, fetch: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Result<T>,
{
    match snapshot {
        Some(snapshot) => snapshot.load_or_fetch(fetch),
        None => fetch(),
    }
}
