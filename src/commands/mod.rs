// src/commands/mod.rs
//! Command handlers for the vertree CLI

mod reindex;
mod resolve;
mod sync;

pub use reindex::cmd_reindex;
pub use resolve::cmd_resolve;
pub use sync::{cmd_checksums, cmd_github};
