// src/cli/mod.rs
//! CLI definitions for vertree
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `github` - Materialize releases from a repository's tags
//! - `checksums` - Materialize releases from a published checksum manifest
//! - `reindex` - Regenerate every aggregator file of an existing tree
//! - `resolve` - Show the version path an identifier maps to

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vertree")]
#[command(author = "Vertree Contributors")]
#[command(version)]
#[command(about = "Materialize upstream releases as a tree of Nix expressions", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output tree and snapshot options shared by the sync commands
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Root of the version tree (default: $ROOT_PATH, then the current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Snapshot file for the upstream listing
    #[arg(long, conflicts_with = "no_snapshot")]
    pub snapshot: Option<PathBuf>,

    /// Always fetch the upstream listing and do not store a snapshot
    #[arg(long)]
    pub no_snapshot: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Materialize releases from GitHub tags (hashes computed with nix-prefetch-url)
    Github {
        /// Repository owner
        #[arg(long, default_value = "ruby")]
        owner: String,

        /// Repository name
        #[arg(long, default_value = "ruby")]
        repo: String,

        /// GitHub API endpoint
        #[arg(long, default_value = vertree::provenance::DEFAULT_GITHUB_API)]
        api: String,

        /// API token (default: $GITHUB_API_TOKEN)
        #[arg(long)]
        token: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Materialize releases listed in a checksum manifest
    Checksums {
        /// URL of the manifest (`<sha256>  <file>` lines)
        #[arg(long)]
        url: String,

        /// URL the archive file names are relative to
        #[arg(long)]
        base_url: String,

        /// Project name prefix of the archive file names
        #[arg(long, default_value = "ruby")]
        project: String,

        /// Archive suffix
        #[arg(long, default_value = ".tar.gz")]
        suffix: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Regenerate every default.nix in an existing tree
    ///
    /// Writes into every directory under the root except hidden ones such as
    /// `.git`.
    Reindex {
        /// Root of the version tree (default: $ROOT_PATH, then the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Show the version path an identifier resolves to
    Resolve {
        /// Tag name or archive file name
        identifier: String,

        /// Treat the identifier as an archive file name instead of a tag
        #[arg(long)]
        filename: bool,

        /// Project name prefix (with --filename)
        #[arg(long, default_value = "ruby")]
        project: String,

        /// Archive suffix (with --filename)
        #[arg(long, default_value = ".tar.gz")]
        suffix: String,
    },
}
