// src/commands/reindex.rs
//! Regenerate the aggregator files of an existing tree

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use vertree::Config;
use vertree::tree::TreeMaterializer;

pub fn cmd_reindex(root: Option<PathBuf>) -> Result<()> {
    let config = Config::from_env()
        .context("Failed to read configuration")?
        .with_overrides(root, None, None);
    info!("Reindexing {}", config.root.display());

    let tree = TreeMaterializer::new(&config.root);
    let written = tree
        .reindex()
        .with_context(|| format!("Failed to reindex {}", config.root.display()))?;
    println!("Rewrote {} aggregator files under {}", written, config.root.display());
    Ok(())
}
