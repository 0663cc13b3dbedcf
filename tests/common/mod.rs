// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use vertree::provenance::{ContentDescriptor, ProvenanceSource, UpstreamRelease};
use vertree::version::VersionPattern;
use vertree::{ContentHasher, Error, Result};
use walkdir::WalkDir;

/// Provenance source serving a fixed release list
pub struct StaticSource {
    pub releases: Vec<UpstreamRelease>,
    pub pattern: VersionPattern,
}

impl StaticSource {
    /// GitHub-style tags needing a hash, for the given tag names
    pub fn tags(names: &[&str]) -> Self {
        let releases = names
            .iter()
            .map(|name| UpstreamRelease {
                identifier: name.to_string(),
                descriptor: ContentDescriptor::UnhashedRef {
                    owner: "ruby".to_string(),
                    repo: "ruby".to_string(),
                    rev: name.to_string(),
                    tarball_url: format!("https://api.github.com/repos/ruby/ruby/tarball/{name}"),
                },
            })
            .collect();

        Self {
            releases,
            pattern: VersionPattern::tag(),
        }
    }
}

impl ProvenanceSource for StaticSource {
    fn name(&self) -> String {
        "static".to_string()
    }

    fn pattern(&self) -> &VersionPattern {
        &self.pattern
    }

    fn fetch_releases(&self) -> Result<Vec<UpstreamRelease>> {
        Ok(self.releases.clone())
    }
}

/// Hasher that records every URL and derives a fake hash from it
#[derive(Default)]
pub struct CountingHasher {
    pub calls: RefCell<Vec<String>>,
    /// URLs that fail as if the download returned 404
    pub failing: Vec<String>,
}

impl CountingHasher {
    pub fn failing_on(url: &str) -> Self {
        Self {
            failing: vec![url.to_string()],
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ContentHasher for CountingHasher {
    fn compute_sha256(&self, url: &str) -> Result<String> {
        self.calls.borrow_mut().push(url.to_string());
        if self.failing.iter().any(|f| f == url) {
            return Err(Error::HashComputation {
                url: url.to_string(),
                diagnostic: "error: unable to download: HTTP error 404".to_string(),
            });
        }
        let tag = url.rsplit('/').next().unwrap_or_default();
        Ok(format!("hash-of-{tag}"))
    }
}

/// Every file under `root` with its contents
pub fn tree_contents(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

/// Attribute names imported by a `default.nix`
pub fn aggregator_keys(dir: &Path) -> BTreeSet<String> {
    let content = fs::read_to_string(dir.join("default.nix")).unwrap();
    content
        .lines()
        .filter_map(|line| line.strip_prefix("  "))
        .map(|line| {
            let (key, value) = line.split_once(" = ").unwrap();
            assert!(value.starts_with("import "), "non-import value: {value}");
            key.trim_matches('"').to_string()
        })
        .collect()
}

/// What an aggregator must import given the directory's contents
pub fn expected_keys(dir: &Path) -> BTreeSet<String> {
    let mut keys: BTreeSet<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    if dir.join("meta.nix").is_file() {
        keys.insert("meta".to_string());
    }
    keys
}

/// Assert every directory's aggregator matches its contents exactly
pub fn assert_aggregators_complete(root: &Path) {
    for entry in WalkDir::new(root) {
        let entry = entry.unwrap();
        if entry.file_type().is_dir() {
            assert_eq!(
                aggregator_keys(entry.path()),
                expected_keys(entry.path()),
                "aggregator mismatch in {}",
                entry.path().display()
            );
        }
    }
}
