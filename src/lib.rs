// src/lib.rs

//! Vertree
//!
//! Discovers the released versions of a project from an upstream source and
//! writes them as a tree of Nix expressions, one directory level per version
//! component. Every directory gets a `default.nix` importing its children so
//! the whole tree evaluates from the root.
//!
//! # Architecture
//!
//! - Provenance sources list `(identifier, descriptor)` pairs (GitHub tags or
//!   a checksum manifest)
//! - The version resolver turns identifiers into version paths, skipping
//!   anything that is not a release
//! - The tree materializer writes leaf manifests and regenerates ancestor
//!   aggregators
//! - Filesystem state is the progress record: existing leaves are never
//!   rewritten, so interrupted runs resume by running again

pub mod config;
mod error;
pub mod expr;
pub mod prefetch;
pub mod provenance;
pub mod sync;
pub mod tree;
pub mod upstream;
pub mod version;

pub use config::Config;
pub use error::{Error, Result};
pub use expr::{Expr, ExprError, Object};
pub use prefetch::{ContentHasher, NixPrefetchUrl};
pub use provenance::{ContentDescriptor, ProvenanceSource, UpstreamRelease};
pub use sync::{SyncReport, sync_releases};
pub use tree::{MaterializeOutcome, TreeMaterializer};
pub use version::{VersionPath, VersionPattern};
