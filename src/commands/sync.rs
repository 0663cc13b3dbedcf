// src/commands/sync.rs
//! Sync commands: fetch an upstream listing and materialize new releases

use crate::cli::OutputArgs;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use vertree::prefetch::NixPrefetchUrl;
use vertree::provenance::{ChecksumManifest, GithubTags, ProvenanceSource, Snapshot};
use vertree::sync::{SyncReport, sync_releases};
use vertree::tree::TreeMaterializer;
use vertree::Config;

/// Default snapshot for GitHub tag listings, relative to the working directory
const GITHUB_SNAPSHOT: &str = "tags.json";

/// Default snapshot for checksum manifests, relative to the working directory
const CHECKSUM_SNAPSHOT: &str = "checksums.json";

/// Resolve the configuration and snapshot for a sync command
fn prepare(
    output: OutputArgs,
    token: Option<String>,
    default_snapshot: &str,
) -> Result<(Config, Option<Snapshot>)> {
    let config = Config::from_env()
        .context("Failed to read configuration")?
        .with_overrides(output.root, token, output.snapshot);

    let snapshot = if output.no_snapshot {
        None
    } else {
        let path = config
            .snapshot
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_snapshot));
        Some(Snapshot::new(path))
    };

    Ok((config, snapshot))
}

fn run(source: &dyn ProvenanceSource, config: &Config) -> Result<()> {
    let tree = TreeMaterializer::new(&config.root);
    let hasher = NixPrefetchUrl::new();

    let report = sync_releases(source, &tree, &hasher)
        .with_context(|| format!("Sync of {} failed", source.name()))?;
    print_report(&report, config);
    Ok(())
}

fn print_report(report: &SyncReport, config: &Config) {
    println!("Version tree: {}", config.root.display());
    println!("  New releases: {}", report.materialized.len());
    for version in &report.materialized {
        println!("    {}", version);
    }
    println!("  Already present: {}", report.already_present);
    println!("  Not releases: {}", report.unrecognized);
}

/// Materialize releases from a GitHub repository's tags
pub fn cmd_github(
    owner: &str,
    repo: &str,
    api: &str,
    token: Option<String>,
    output: OutputArgs,
) -> Result<()> {
    let (config, snapshot) = prepare(output, token, GITHUB_SNAPSHOT)?;
    info!("Materializing tags of {}/{}", owner, repo);

    let source = GithubTags::new(owner, repo)
        .with_api_base(api)
        .with_token(config.github_token.clone())
        .with_snapshot(snapshot);
    run(&source, &config)
}

/// Materialize releases listed in a checksum manifest
pub fn cmd_checksums(
    url: &str,
    base_url: &str,
    project: &str,
    suffix: &str,
    output: OutputArgs,
) -> Result<()> {
    let (config, snapshot) = prepare(output, None, CHECKSUM_SNAPSHOT)?;
    info!("Materializing {} releases from {}", project, url);

    let source = ChecksumManifest::new(url, base_url, project, suffix)?.with_snapshot(snapshot);
    run(&source, &config)
}
