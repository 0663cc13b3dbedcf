// src/commands/resolve.rs
//! Show how an upstream identifier maps into the tree

use anyhow::Result;
use vertree::tree::{AGGREGATOR_FILE, MANIFEST_FILE};
use vertree::version::VersionPattern;

pub fn cmd_resolve(identifier: &str, filename: bool, project: &str, suffix: &str) -> Result<()> {
    let pattern = if filename {
        VersionPattern::filename(project, suffix)?
    } else {
        VersionPattern::tag()
    };

    match pattern.resolve(identifier) {
        Some(version) => {
            println!("{} -> {}", identifier, version);
            println!("  manifest: {}", version.to_path().join(MANIFEST_FILE).display());
            println!("  aggregators: {}", version.depth() + 1);
            for ancestor in version.ancestors() {
                println!("    {}", ancestor.join(AGGREGATOR_FILE).display());
            }
        }
        None => println!("{}: not a release identifier", identifier),
    }
    Ok(())
}
