// src/sync.rs

//! Release synchronization
//!
//! Drives one run: fetch the release list, resolve each identifier, and
//! materialize the versions that are not on disk yet. Versions are processed
//! strictly one at a time in upstream order because every write rereads the
//! ancestor directory listings.

use crate::error::Result;
use crate::prefetch::ContentHasher;
use crate::provenance::ProvenanceSource;
use crate::tree::{MaterializeOutcome, TreeMaterializer};
use crate::version::VersionPath;
use tracing::{debug, info};

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Versions written during this run, in processing order
    pub materialized: Vec<VersionPath>,
    /// Versions whose manifest already existed
    pub already_present: usize,
    /// Identifiers that are not releases
    pub unrecognized: usize,
}

impl SyncReport {
    pub fn total_releases(&self) -> usize {
        self.materialized.len() + self.already_present
    }
}

/// Materialize every release of `source` under `tree`
///
/// The first error aborts the run. Leaves written before it stay on disk and
/// are skipped by the next run.
pub fn sync_releases(
    source: &dyn ProvenanceSource,
    tree: &TreeMaterializer,
    hasher: &dyn ContentHasher,
) -> Result<SyncReport> {
    info!("Syncing {} into {}", source.name(), tree.root().display());

    let releases = source.fetch_releases()?;
    let pattern = source.pattern();
    let mut report = SyncReport::default();

    for release in &releases {
        let Some(version) = pattern.resolve(&release.identifier) else {
            debug!("Skipping {}: not a release", release.identifier);
            report.unrecognized += 1;
            continue;
        };

        match tree.materialize(&version, &release.descriptor, hasher)? {
            MaterializeOutcome::AlreadyPresent => report.already_present += 1,
            MaterializeOutcome::Written { .. } => {
                info!("Materialized {} as {}", release.identifier, version);
                report.materialized.push(version);
            }
        }
    }

    info!(
        "Sync complete: {} new, {} already present, {} skipped of {} upstream entries",
        report.materialized.len(),
        report.already_present,
        report.unrecognized,
        releases.len()
    );
    Ok(report)
}
