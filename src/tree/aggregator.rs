// src/tree/aggregator.rs

//! Aggregator files (`default.nix`)
//!
//! An aggregator is a pure function of its directory listing: one import per
//! immediate subdirectory, keyed by directory name, plus `meta` when the
//! directory holds a manifest. It is always rewritten in full, never patched.

use super::{AGGREGATOR_FILE, MANIFEST_FILE, MANIFEST_KEY};
use crate::error::{Error, Result};
use crate::expr::{Expr, Object};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Build the aggregator expression for a directory from its current contents
///
/// Subdirectories are listed in file-name order so the output does not depend
/// on the filesystem's listing order. Symlinks to directories count as
/// subdirectories.
pub fn aggregator_for(dir: &Path) -> Result<Object> {
    build_aggregator(dir, dir.join(MANIFEST_FILE).is_file())
}

/// Build an aggregator, importing `meta` when `with_manifest` is set
///
/// Lets the materializer plan a leaf's aggregator before its manifest exists.
pub(super) fn build_aggregator(dir: &Path, with_manifest: bool) -> Result<Object> {
    let mut obj = Object::new();

    let listing = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in listing {
        let entry = entry.map_err(|e| {
            Error::IoError(format!("Failed to list {}: {e}", dir.display()))
        })?;
        if !entry.path().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(
                "Skipping non UTF-8 directory name {:?} in {}",
                entry.file_name(),
                dir.display()
            );
            continue;
        };
        obj.insert(name, Expr::import(Expr::child(name)?))?;
    }

    if with_manifest {
        obj.insert(MANIFEST_KEY, Expr::import(Expr::child(MANIFEST_FILE)?))?;
    }

    Ok(obj)
}

/// Regenerate and overwrite the aggregator file of a directory
///
/// Usable on any directory, not only those touched by a materialization.
pub fn write_aggregator(dir: &Path) -> Result<()> {
    store_aggregator(dir, aggregator_for(dir)?)
}

/// Overwrite the aggregator file of `dir` with `obj`
pub(super) fn store_aggregator(dir: &Path, obj: Object) -> Result<()> {
    let path = dir.join(AGGREGATOR_FILE);
    debug!("Writing {} ({} entries)", path.display(), obj.len());

    fs::write(&path, super::file_contents(obj)).map_err(|source| Error::AggregatorWrite {
        path: path.clone(),
        source,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

/// Regenerate every aggregator under `root`, deepest directories first
///
/// Hidden directories such as `.git` are not descended into. Returns the
/// number of aggregators written.
pub fn reindex(root: &Path) -> Result<usize> {
    let walk = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    let mut dirs = Vec::new();
    for entry in walk {
        let entry = entry.map_err(|e| {
            Error::IoError(format!("Failed to walk {}: {e}", root.display()))
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    // Reversed pre-order visits every directory after all of its descendants
    for dir in dirs.iter().rev() {
        write_aggregator(dir)?;
    }

    Ok(dirs.len())
}
