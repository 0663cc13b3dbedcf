// src/provenance/descriptor.rs

//! Content descriptors - where a release tarball lives and how to verify it

use crate::error::Result;
use crate::expr::{ExprError, Object};
use serde::Serialize;

/// Location and integrity data for one release's source archive
///
/// The hashed variants are final and render directly to a manifest. The
/// unhashed variants still need the archive hashed; [`finalize`] turns them
/// into their hashed counterpart.
///
/// [`finalize`]: ContentDescriptor::finalize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDescriptor {
    /// A named revision of a hosted repository with a known hash
    HashedRef {
        owner: String,
        repo: String,
        rev: String,
        sha256: String,
    },
    /// A direct tarball URL with a known hash
    HashedUrl { url: String, sha256: String },
    /// A named revision whose tarball must be hashed first
    UnhashedRef {
        owner: String,
        repo: String,
        rev: String,
        tarball_url: String,
    },
    /// A direct tarball URL that must be hashed first
    UnhashedUrl { url: String },
}

/// Manifest field layout; order here is the order written to disk
#[derive(Serialize)]
#[serde(untagged)]
enum ManifestFields<'a> {
    Ref {
        owner: &'a str,
        repo: &'a str,
        rev: &'a str,
        sha256: &'a str,
    },
    Url {
        url: &'a str,
        sha256: &'a str,
    },
}

impl ContentDescriptor {
    /// Whether the archive has to be hashed before a manifest can be written
    pub fn requires_hash(&self) -> bool {
        matches!(self, Self::UnhashedRef { .. } | Self::UnhashedUrl { .. })
    }

    /// URL of the archive to hash, for descriptors that need it
    pub fn fetch_url(&self) -> Option<&str> {
        match self {
            Self::UnhashedRef { tarball_url, .. } => Some(tarball_url),
            Self::UnhashedUrl { url } => Some(url),
            Self::HashedRef { .. } | Self::HashedUrl { .. } => None,
        }
    }

    /// Attach a computed hash, producing a final descriptor
    ///
    /// Already hashed descriptors are returned unchanged.
    pub fn finalize(self, sha256: impl Into<String>) -> Self {
        match self {
            Self::UnhashedRef {
                owner, repo, rev, ..
            } => Self::HashedRef {
                owner,
                repo,
                rev,
                sha256: sha256.into(),
            },
            Self::UnhashedUrl { url } => Self::HashedUrl {
                url,
                sha256: sha256.into(),
            },
            hashed => hashed,
        }
    }

    /// Render the manifest attribute set for a final descriptor
    ///
    /// Keys are exactly the descriptor's fields: `owner, repo, rev, sha256` or
    /// `url, sha256`. Calling this on an unhashed descriptor is a
    /// `TypeMismatch`.
    pub fn manifest(&self) -> Result<Object> {
        let fields = match self {
            Self::HashedRef {
                owner,
                repo,
                rev,
                sha256,
            } => ManifestFields::Ref {
                owner,
                repo,
                rev,
                sha256,
            },
            Self::HashedUrl { url, sha256 } => ManifestFields::Url { url, sha256 },
            Self::UnhashedRef { .. } | Self::UnhashedUrl { .. } => {
                return Err(ExprError::TypeMismatch {
                    expected: "hashed descriptor",
                    found: "unhashed descriptor",
                }
                .into());
            }
        };

        let value = serde_json::to_value(&fields).map_err(|e| {
            crate::Error::ParseError(format!("Failed to serialize manifest fields: {e}"))
        })?;
        Ok(Object::from_json(&value)?)
    }
}
