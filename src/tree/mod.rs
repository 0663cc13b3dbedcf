// src/tree/mod.rs

//! Version tree materialization
//!
//! Releases are laid out as nested directories under a root, one level per
//! version path segment:
//!
//! ```text
//! root/
//! ├── default.nix            { "2" = import ./2; }
//! └── 2/
//!     ├── default.nix        { "6" = import ./6; }
//!     └── 6/
//!         ├── default.nix    { "3" = import ./3; }
//!         └── 3/
//!             ├── default.nix   { meta = import ./meta.nix; }
//!             └── meta.nix      { url = "..."; sha256 = "..."; }
//! ```
//!
//! The filesystem is the only record of progress. A leaf whose manifest
//! exists is done and is never touched again, so an interrupted run resumes
//! by simply running again.

mod aggregator;

pub use aggregator::{aggregator_for, reindex, write_aggregator};

use aggregator::{build_aggregator, store_aggregator};

use crate::error::{Error, Result};
use crate::expr::{Expr, Object};
use crate::prefetch::ContentHasher;
use crate::provenance::ContentDescriptor;
use crate::version::VersionPath;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Manifest file written in every leaf directory
pub const MANIFEST_FILE: &str = "meta.nix";

/// Aggregator file written in every directory
pub const AGGREGATOR_FILE: &str = "default.nix";

/// Key under which an aggregator imports its directory's manifest
pub const MANIFEST_KEY: &str = "meta";

/// Result of materializing one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// The leaf manifest already existed; nothing was written
    AlreadyPresent,
    /// The manifest was written and `aggregators` files were regenerated
    Written { leaf: PathBuf, aggregators: usize },
}

/// Writes manifests and aggregators below a root directory
#[derive(Debug, Clone)]
pub struct TreeMaterializer {
    root: PathBuf,
}

impl TreeMaterializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the manifest of `version`
    pub fn leaf_path(&self, version: &VersionPath) -> PathBuf {
        self.root.join(version.to_path())
    }

    /// Whether `version` has already been written
    pub fn is_materialized(&self, version: &VersionPath) -> bool {
        self.leaf_path(version).join(MANIFEST_FILE).is_file()
    }

    /// Materialize one version
    ///
    /// 1. Skip entirely if the leaf manifest exists.
    /// 2. Create the leaf and any missing ancestors.
    /// 3. Hash the archive if the descriptor needs it.
    /// 4. Build the aggregators of the leaf and every ancestor up to and
    ///    including the root.
    /// 5. Write the manifest, then the aggregators.
    ///
    /// Any failure is returned immediately; nothing is rolled back. Everything
    /// that can fail without touching the disk happens before the manifest is
    /// written, because a leaf with a manifest is never revisited.
    pub fn materialize(
        &self,
        version: &VersionPath,
        descriptor: &ContentDescriptor,
        hasher: &dyn ContentHasher,
    ) -> Result<MaterializeOutcome> {
        let leaf = self.leaf_path(version);
        let manifest_path = leaf.join(MANIFEST_FILE);

        if manifest_path.is_file() {
            debug!("{} already materialized", version);
            return Ok(MaterializeOutcome::AlreadyPresent);
        }

        ensure_dir(&leaf)?;

        let descriptor = match descriptor.fetch_url() {
            Some(url) => {
                let sha256 = hasher.compute_sha256(url)?;
                descriptor.clone().finalize(sha256)
            }
            None => descriptor.clone(),
        };

        let manifest = descriptor.manifest()?;
        let planned = version
            .ancestors()
            .enumerate()
            .map(|(idx, relative)| -> Result<(PathBuf, Object)> {
                let dir = self.root.join(relative);
                let obj = if idx == 0 {
                    build_aggregator(&dir, true)?
                } else {
                    aggregator_for(&dir)?
                };
                Ok((dir, obj))
            })
            .collect::<Result<Vec<_>>>()?;

        fs::write(&manifest_path, file_contents(manifest)).map_err(|source| {
            Error::ManifestWrite {
                path: manifest_path.clone(),
                source,
            }
        })?;
        info!("Wrote {}", manifest_path.display());

        let aggregators = planned.len();
        for (dir, obj) in planned {
            store_aggregator(&dir, obj)?;
        }

        Ok(MaterializeOutcome::Written { leaf, aggregators })
    }

    /// Regenerate every aggregator in the tree
    pub fn reindex(&self) -> Result<usize> {
        ensure_dir(&self.root)?;
        reindex(&self.root)
    }
}

/// Create a directory and its missing parents
///
/// An existing directory is fine; anything else in the way is an error.
fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })
}

/// File body for a top-level expression
fn file_contents(obj: Object) -> String {
    let mut text = Expr::Object(obj).render();
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Hasher that records requested URLs and returns a fixed hash
    #[derive(Default)]
    struct RecordingHasher {
        calls: RefCell<Vec<String>>,
    }

    impl ContentHasher for RecordingHasher {
        fn compute_sha256(&self, url: &str) -> Result<String> {
            self.calls.borrow_mut().push(url.to_string());
            Ok("0fakehash".to_string())
        }
    }

    struct FailingHasher;

    impl ContentHasher for FailingHasher {
        fn compute_sha256(&self, url: &str) -> Result<String> {
            Err(Error::HashComputation {
                url: url.to_string(),
                diagnostic: "error: unable to download: HTTP error 404".to_string(),
            })
        }
    }

    fn tag(rev: &str) -> ContentDescriptor {
        ContentDescriptor::UnhashedRef {
            owner: "ruby".into(),
            repo: "ruby".into(),
            rev: rev.into(),
            tarball_url: format!("https://api.github.com/repos/ruby/ruby/tarball/{rev}"),
        }
    }

    fn version(segments: &[&str]) -> VersionPath {
        VersionPath::new(segments.iter().copied()).unwrap()
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_materialize_writes_manifest_and_aggregators() {
        let temp = TempDir::new().unwrap();
        let tree = TreeMaterializer::new(temp.path());
        let hasher = RecordingHasher::default();

        let outcome = tree
            .materialize(&version(&["2", "6", "3"]), &tag("v2_6_3"), &hasher)
            .unwrap();
        assert_eq!(
            outcome,
            MaterializeOutcome::Written {
                leaf: temp.path().join("2/6/3"),
                aggregators: 4
            }
        );

        assert_eq!(
            read(temp.path().join("2/6/3/meta.nix")),
            "{\n  owner = \"ruby\";\n  repo = \"ruby\";\n  rev = \"v2_6_3\";\n  sha256 = \"0fakehash\";\n}\n"
        );
        assert_eq!(
            read(temp.path().join("2/6/3/default.nix")),
            "{\n  meta = import ./meta.nix;\n}\n"
        );
        assert_eq!(
            read(temp.path().join("2/6/default.nix")),
            "{\n  \"3\" = import ./3;\n}\n"
        );
        assert_eq!(
            read(temp.path().join("default.nix")),
            "{\n  \"2\" = import ./2;\n}\n"
        );
        assert_eq!(
            *hasher.calls.borrow(),
            ["https://api.github.com/repos/ruby/ruby/tarball/v2_6_3"]
        );
    }

    #[test]
    fn test_existing_leaf_is_skipped() {
        let temp = TempDir::new().unwrap();
        let tree = TreeMaterializer::new(temp.path());
        let hasher = RecordingHasher::default();
        let v = version(&["2", "6", "3"]);

        tree.materialize(&v, &tag("v2_6_3"), &hasher).unwrap();
        // Remove an ancestor aggregator to prove the skip writes nothing
        fs::remove_file(temp.path().join("2/default.nix")).unwrap();

        let outcome = tree.materialize(&v, &tag("v2_6_3"), &hasher).unwrap();
        assert_eq!(outcome, MaterializeOutcome::AlreadyPresent);
        assert_eq!(hasher.calls.borrow().len(), 1);
        assert!(!temp.path().join("2/default.nix").exists());
        assert!(tree.is_materialized(&v));
    }

    #[test]
    fn test_labelled_release_nests_under_release() {
        let temp = TempDir::new().unwrap();
        let tree = TreeMaterializer::new(temp.path());
        let hasher = RecordingHasher::default();

        tree.materialize(&version(&["2", "6", "0", "preview1"]), &tag("v2_6_0_preview1"), &hasher)
            .unwrap();
        tree.materialize(&version(&["2", "6", "0"]), &tag("v2_6_0"), &hasher)
            .unwrap();

        assert_eq!(
            read(temp.path().join("2/6/0/default.nix")),
            "{\n  preview1 = import ./preview1;\n  meta = import ./meta.nix;\n}\n"
        );
    }

    #[test]
    fn test_hash_failure_aborts_before_manifest() {
        let temp = TempDir::new().unwrap();
        let tree = TreeMaterializer::new(temp.path());
        let v = version(&["2", "6", "3"]);

        let err = tree.materialize(&v, &tag("v2_6_3"), &FailingHasher).unwrap_err();
        assert!(matches!(err, Error::HashComputation { .. }));
        assert!(!tree.is_materialized(&v));
        assert!(!temp.path().join("default.nix").exists());
    }

    #[test]
    fn test_unusual_sibling_directory_keeps_tree_consistent() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("build output")).unwrap();
        let tree = TreeMaterializer::new(temp.path());

        tree.materialize(&version(&["2", "6", "3"]), &tag("v2_6_3"), &RecordingHasher::default())
            .unwrap();

        assert_eq!(
            read(temp.path().join("default.nix")),
            "{\n  \"2\" = import ./2;\n  \"build output\" = import (./. + \"/build output\");\n}\n"
        );
        assert_eq!(
            read(temp.path().join("2/6/3/default.nix")),
            "{\n  meta = import ./meta.nix;\n}\n"
        );
    }

    #[test]
    fn test_known_hash_skips_hasher() {
        let temp = TempDir::new().unwrap();
        let tree = TreeMaterializer::new(temp.path());
        let descriptor = ContentDescriptor::HashedUrl {
            url: "https://cache.example.org/pub/ruby/ruby-2.6.3.tar.gz".into(),
            sha256: "abcdef0123".into(),
        };

        tree.materialize(&version(&["2", "6", "3"]), &descriptor, &FailingHasher)
            .unwrap();
        assert!(read(temp.path().join("2/6/3/meta.nix")).contains("sha256 = \"abcdef0123\";"));
    }

    #[test]
    fn test_file_in_place_of_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("2"), "not a directory").unwrap();
        let tree = TreeMaterializer::new(temp.path());

        let err = tree
            .materialize(&version(&["2", "6", "3"]), &tag("v2_6_3"), &RecordingHasher::default())
            .unwrap_err();
        assert!(matches!(err, Error::DirectoryCreation { .. }));
    }
}
