// src/prefetch.rs

//! Archive hashing through `nix-prefetch-url`
//!
//! Sources that cannot publish a hash (GitHub tag tarballs) need the archive
//! downloaded, unpacked and hashed the same way the Nix fetchers will later
//! verify it. That job is delegated to `nix-prefetch-url --unpack`.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// Name of the hashing tool looked up on `PATH`
pub const PREFETCH_TOOL: &str = "nix-prefetch-url";

/// A collaborator that computes the content hash of a remote archive
pub trait ContentHasher {
    /// Return the sha256 of the unpacked archive at `url`
    fn compute_sha256(&self, url: &str) -> Result<String>;
}

/// [`ContentHasher`] backed by `nix-prefetch-url`
#[derive(Debug, Clone, Default)]
pub struct NixPrefetchUrl {
    program: Option<PathBuf>,
}

impl NixPrefetchUrl {
    /// Use the tool found on `PATH`, located on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit program instead of searching `PATH`
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    fn program(&self) -> Result<PathBuf> {
        match &self.program {
            Some(program) => Ok(program.clone()),
            None => which::which(PREFETCH_TOOL).map_err(|e| {
                Error::ToolNotFound(format!("{PREFETCH_TOOL} ({e}). Is Nix installed?"))
            }),
        }
    }
}

impl ContentHasher for NixPrefetchUrl {
    fn compute_sha256(&self, url: &str) -> Result<String> {
        let program = self.program()?;
        info!("Prefetching {}", url);

        let output = Command::new(&program)
            .args(["--type", "sha256", "--unpack", url])
            .output()
            .map_err(|e| Error::HashComputation {
                url: url.to_string(),
                diagnostic: format!("failed to run {}: {e}", program.display()),
            })?;

        if !output.status.success() {
            return Err(Error::HashComputation {
                url: url.to_string(),
                diagnostic: format!(
                    "{} exited with {}: {}",
                    program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        // The hash is the last line; earlier lines are progress chatter
        let stdout = String::from_utf8_lossy(&output.stdout);
        let hash = stdout.lines().map(str::trim).rfind(|l| !l.is_empty());
        match hash {
            Some(hash) => {
                debug!("{} -> {}", url, hash);
                Ok(hash.to_string())
            }
            None => Err(Error::HashComputation {
                url: url.to_string(),
                diagnostic: format!("{} printed no hash", program.display()),
            }),
        }
    }
}
