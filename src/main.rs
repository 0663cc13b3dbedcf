// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Github {
            owner,
            repo,
            api,
            token,
            output,
        } => commands::cmd_github(&owner, &repo, &api, token, output),
        Commands::Checksums {
            url,
            base_url,
            project,
            suffix,
            output,
        } => commands::cmd_checksums(&url, &base_url, &project, &suffix, output),
        Commands::Reindex { root } => commands::cmd_reindex(root),
        Commands::Resolve {
            identifier,
            filename,
            project,
            suffix,
        } => commands::cmd_resolve(&identifier, filename, &project, &suffix),
    }
}
