// src/provenance/checksums.rs

//! Published checksum manifests as a provenance source
//!
//! Parses `sha256sum` style listings:
//!
//! ```text
//! abcdef0123  ruby-2.6.3.tar.gz
//! 456789abcd *ruby-2.6.2.tar.gz
//! ```
//!
//! The hash is already known, so releases from this source never need the
//! hashing tool.

use super::{ContentDescriptor, ProvenanceSource, Snapshot, UpstreamRelease};
use crate::error::{Error, Result};
use crate::upstream::UpstreamClient;
use crate::version::VersionPattern;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// One line of a checksum manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumEntry {
    pub sha256: String,
    pub filename: String,
}

/// Parse a checksum manifest
///
/// Blank lines and `#` comments are ignored. Lines that do not have both a
/// hash and a file name are skipped with a warning.
pub fn parse_checksums(content: &str) -> Vec<ChecksumEntry> {
    let mut entries = Vec::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(sha256), Some(filename)) = (fields.next(), fields.next()) else {
            warn!("Skipping malformed checksum line {}: {:?}", lineno + 1, line);
            continue;
        };

        entries.push(ChecksumEntry {
            sha256: sha256.to_string(),
            // `*` marks binary mode in sha256sum output
            filename: filename.trim_start_matches('*').to_string(),
        });
    }

    entries
}

/// Releases listed in a remote checksum manifest
pub struct ChecksumManifest {
    manifest_url: String,
    base_url: Url,
    suffix: String,
    snapshot: Option<Snapshot>,
    pattern: VersionPattern,
}

impl ChecksumManifest {
    /// Create a source for `<project>-<version><suffix>` archives
    ///
    /// Tarball URLs are built by appending each file name to `base_url`.
    pub fn new(manifest_url: &str, base_url: &str, project: &str, suffix: &str) -> Result<Self> {
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base)
            .map_err(|e| Error::InitError(format!("Invalid base URL {base_url}: {e}")))?;

        Ok(Self {
            manifest_url: manifest_url.to_string(),
            base_url,
            suffix: suffix.to_string(),
            snapshot: None,
            pattern: VersionPattern::filename(project, suffix)?,
        })
    }

    pub fn with_snapshot(mut self, snapshot: Option<Snapshot>) -> Self {
        self.snapshot = snapshot;
        self
    }

    fn fetch_entries(&self) -> Result<Vec<ChecksumEntry>> {
        let client = UpstreamClient::new()?;
        let content = client.fetch_text(&self.manifest_url)?;
        let entries = parse_checksums(&content);
        debug!("Parsed {} checksum entries", entries.len());
        Ok(entries)
    }

    /// Turn manifest entries into releases with known hashes
    ///
    /// Only entries naming an archive with the configured suffix are kept.
    /// Archive names that cannot be joined onto the base URL are skipped with
    /// a warning.
    pub fn releases_from_entries(&self, entries: Vec<ChecksumEntry>) -> Result<Vec<UpstreamRelease>> {
        let mut releases = Vec::new();

        for entry in entries {
            if !entry.filename.ends_with(&self.suffix) {
                debug!("Skipping {}: not a {} archive", entry.filename, self.suffix);
                continue;
            }

            let url = match self.base_url.join(&entry.filename) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping invalid archive name {}: {e}", entry.filename);
                    continue;
                }
            };

            releases.push(UpstreamRelease {
                identifier: entry.filename,
                descriptor: ContentDescriptor::HashedUrl {
                    url: url.to_string(),
                    sha256: entry.sha256,
                },
            });
        }

        Ok(releases)
    }
}

impl ProvenanceSource for ChecksumManifest {
    fn name(&self) -> String {
        format!("checksums:{}", self.manifest_url)
    }

    fn pattern(&self) -> &VersionPattern {
        &self.pattern
    }

    fn fetch_releases(&self) -> Result<Vec<UpstreamRelease>> {
        let entries =
            super::snapshot::fetch_cached(self.snapshot.as_ref(), || self.fetch_entries())?;
        self.releases_from_entries(entries)
    }
}
