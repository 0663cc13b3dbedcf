// src/error.rs

//! Error types for vertree
//!
//! Every variant except the expression errors aborts the current run. There is
//! no retry and no rollback: leaves written earlier in the run stay on disk and
//! are skipped by the next invocation.

use crate::expr::ExprError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Download error: {0}")]
    DownloadError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Initialization error: {0}")]
    InitError(String),

    #[error("Required tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid version path: {0}")]
    InvalidVersionPath(String),

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreation { path: PathBuf, source: io::Error },

    #[error("Hash computation failed for {url}: {diagnostic}")]
    HashComputation { url: String, diagnostic: String },

    #[error("Failed to write manifest {}: {source}", .path.display())]
    ManifestWrite { path: PathBuf, source: io::Error },

    #[error("Failed to write aggregator {}: {source}", .path.display())]
    AggregatorWrite { path: PathBuf, source: io::Error },

    #[error("Expression error: {0}")]
    Expression(#[from] ExprError),
}

/// Result type for vertree operations
pub type Result<T> = std::result::Result<T, Error>;
