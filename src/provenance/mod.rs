// src/provenance/mod.rs

//! Provenance sources - where release lists come from
//!
//! A source yields `(identifier, descriptor)` pairs in upstream order. The
//! two implementations differ only in whether the archive hash is already
//! known:
//!
//! | Source | Identifier | Descriptor |
//! |--------|------------|------------|
//! | [`GithubTags`] | tag name (`v2_6_3`) | `UnhashedRef`, hashed locally |
//! | [`ChecksumManifest`] | file name (`ruby-2.6.3.tar.gz`) | `HashedUrl` |
//!
//! Both can keep a [`Snapshot`] of the raw listing to avoid repeated network
//! round trips across runs.

mod checksums;
mod descriptor;
mod github;
mod snapshot;

pub use checksums::{ChecksumEntry, ChecksumManifest, parse_checksums};
pub use descriptor::ContentDescriptor;
pub use github::{DEFAULT_GITHUB_API, GitTag, GithubTags, TagCommit};
pub use snapshot::Snapshot;

use crate::error::Result;
use crate::version::VersionPattern;

/// One release as reported upstream, before version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRelease {
    /// Raw tag name or file name
    pub identifier: String,
    pub descriptor: ContentDescriptor,
}

/// A collaborator that lists upstream releases
pub trait ProvenanceSource {
    /// Human readable name for logs
    fn name(&self) -> String;

    /// Pattern that turns this source's identifiers into version paths
    fn pattern(&self) -> &VersionPattern;

    /// Fetch the complete release list, in upstream order
    fn fetch_releases(&self) -> Result<Vec<UpstreamRelease>>;
}
