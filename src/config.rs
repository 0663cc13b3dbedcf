// src/config.rs

//! Process configuration
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `ROOT_PATH` | Output root of the version tree | current directory |
//! | `GITHUB_API_TOKEN` | Token for the GitHub API | none (anonymous) |
//! | `VERTREE_SNAPSHOT` | Snapshot file for the upstream listing | per-source default |
//!
//! Command-line flags override all of these.

use crate::error::{Error, Result};
use std::path::PathBuf;

pub const ROOT_PATH_VAR: &str = "ROOT_PATH";
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_API_TOKEN";
pub const SNAPSHOT_VAR: &str = "VERTREE_SNAPSHOT";

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the generated tree
    pub root: PathBuf,
    pub github_token: Option<String>,
    /// Explicit snapshot path, if configured
    pub snapshot: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let root = match get(ROOT_PATH_VAR) {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().map_err(|e| {
                Error::InitError(format!("Cannot determine current directory: {e}"))
            })?,
        };

        Ok(Self {
            root,
            github_token: get(GITHUB_TOKEN_VAR),
            snapshot: get(SNAPSHOT_VAR).map(PathBuf::from),
        })
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        root: Option<PathBuf>,
        github_token: Option<String>,
        snapshot: Option<PathBuf>,
    ) -> Self {
        if let Some(root) = root {
            self.root = root;
        }
        if github_token.is_some() {
            self.github_token = github_token;
        }
        if snapshot.is_some() {
            self.snapshot = snapshot;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.root, std::env::current_dir().unwrap());
        assert_eq!(config.github_token, None);
        assert_eq!(config.snapshot, None);
    }

    #[test]
    fn test_environment_values() {
        let config = Config::from_lookup(lookup(&[
            ("ROOT_PATH", "/out"),
            ("GITHUB_API_TOKEN", "ghp_secret"),
            ("VERTREE_SNAPSHOT", "/tmp/tags.json"),
        ]))
        .unwrap();
        assert_eq!(config.root, PathBuf::from("/out"));
        assert_eq!(config.github_token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.snapshot, Some(PathBuf::from("/tmp/tags.json")));
    }

    #[test]
    fn test_empty_value_is_unset() {
        let config = Config::from_lookup(lookup(&[("ROOT_PATH", "")])).unwrap();
        assert_eq!(config.root, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::from_lookup(lookup(&[("ROOT_PATH", "/out")]))
            .unwrap()
            .with_overrides(Some(PathBuf::from("/elsewhere")), None, None);
        assert_eq!(config.root, PathBuf::from("/elsewhere"));
        assert_eq!(config.github_token, None);
    }
}
