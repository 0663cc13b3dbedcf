// src/version/mod.rs

//! Upstream version identifiers and the tree paths derived from them
//!
//! Upstreams name their releases in different shapes. Two are recognized:
//!
//! - Tag form: `v2_6_3`, `v2_6_0_preview1`
//! - Filename form: `ruby-2.6.3.tar.gz`, `ruby-2.7.0-preview1.tar.gz`
//!
//! Both resolve to a [`VersionPath`] such as `["2", "6", "3"]`. An optional
//! label always becomes one extra trailing segment, so labelled releases live
//! one directory deeper than the release they precede.
//!
//! Identifiers that do not match are not errors: most repositories carry tags
//! and files that are not releases, and those are simply skipped.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v(\d+)_(\d+)_(\d+)(?:_([A-Za-z0-9]+))?$").unwrap());

/// Ordered, non-empty list of directory names identifying one release
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionPath {
    segments: Vec<String>,
}

impl VersionPath {
    /// Build a version path, validating every segment
    ///
    /// Segments must be non-empty, must not be `.` or `..`, and must not
    /// contain path separators or NUL.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();

        if segments.is_empty() {
            return Err(Error::InvalidVersionPath("no segments".to_string()));
        }

        for segment in &segments {
            let invalid = segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['/', '\\', '\0']);
            if invalid {
                return Err(Error::InvalidVersionPath(format!(
                    "invalid segment {:?} in {:?}",
                    segment, segments
                )));
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Relative filesystem path of the leaf directory
    pub fn to_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    /// Relative paths of the leaf and every ancestor, deepest first
    ///
    /// The last item is the empty path, i.e. the tree root itself.
    pub fn ancestors(&self) -> impl Iterator<Item = PathBuf> + '_ {
        (0..=self.segments.len())
            .rev()
            .map(|depth| self.segments[..depth].iter().collect())
    }
}

impl fmt::Display for VersionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Which identifier shape a pattern recognizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    /// Git tags shaped like `v<major>_<minor>_<patch>[_<label>]`
    Tag,
    /// Archive names shaped like `<project>-<major>.<minor>.<patch>[-<label>]<suffix>`
    Filename { project: String, suffix: String },
}

/// A compiled identifier pattern
#[derive(Debug, Clone)]
pub struct VersionPattern {
    kind: PatternKind,
    regex: Regex,
}

impl VersionPattern {
    /// Pattern for `v2_6_3` style tags
    pub fn tag() -> Self {
        Self {
            kind: PatternKind::Tag,
            regex: Regex::clone(&TAG_RE),
        }
    }

    /// Pattern for `<project>-2.6.3<suffix>` style archive names
    pub fn filename(project: &str, suffix: &str) -> Result<Self> {
        let pattern = format!(
            r"^{}-(\d+)\.(\d+)\.(\d+)(?:-([A-Za-z0-9]+))?{}$",
            regex::escape(project),
            regex::escape(suffix)
        );
        let regex = Regex::new(&pattern)
            .map_err(|e| Error::InitError(format!("Invalid filename pattern for {project}: {e}")))?;

        Ok(Self {
            kind: PatternKind::Filename {
                project: project.to_string(),
                suffix: suffix.to_string(),
            },
            regex,
        })
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    /// Resolve an identifier to its version path
    ///
    /// Returns `None` when the identifier is not a release.
    pub fn resolve(&self, identifier: &str) -> Option<VersionPath> {
        let captures = self.regex.captures(identifier)?;
        let segments: Vec<&str> = captures
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str())
            .collect();

        VersionPath::new(segments).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn segments(path: &VersionPath) -> Vec<&str> {
        path.segments().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_tag_release() {
        let path = VersionPattern::tag().resolve("v2_6_3").unwrap();
        assert_eq!(segments(&path), ["2", "6", "3"]);
    }

    #[test]
    fn test_tag_with_label() {
        let path = VersionPattern::tag().resolve("v2_6_3_preview1").unwrap();
        assert_eq!(segments(&path), ["2", "6", "3", "preview1"]);
        assert_eq!(path.depth(), 4);
    }

    #[test]
    fn test_tag_unrecognized() {
        let pattern = VersionPattern::tag();
        assert!(pattern.resolve("nightly").is_none());
        assert!(pattern.resolve("v2_6").is_none());
        assert!(pattern.resolve("v2.6.3").is_none());
        assert!(pattern.resolve("v2_6_3_").is_none());
        assert!(pattern.resolve("v2_6_3_pre_view").is_none());
        assert!(pattern.resolve("release-v2_6_3").is_none());
    }

    #[test]
    fn test_filename_release() {
        let pattern = VersionPattern::filename("ruby", ".tar.gz").unwrap();
        let path = pattern.resolve("ruby-2.6.3.tar.gz").unwrap();
        assert_eq!(segments(&path), ["2", "6", "3"]);

        let path = pattern.resolve("ruby-2.7.0-preview1.tar.gz").unwrap();
        assert_eq!(segments(&path), ["2", "7", "0", "preview1"]);
    }

    #[test]
    fn test_filename_unrecognized() {
        let pattern = VersionPattern::filename("ruby", ".tar.gz").unwrap();
        assert!(pattern.resolve("ruby-2.6.3.tar.xz").is_none());
        assert!(pattern.resolve("ruby-2.6.3.zip").is_none());
        assert!(pattern.resolve("jruby-2.6.3.tar.gz").is_none());
        assert!(pattern.resolve("ruby-2.6.tar.gz").is_none());
        assert!(pattern.resolve("ruby-2x6x3.tar.gz").is_none());
    }

    #[test]
    fn test_filename_project_is_literal() {
        let pattern = VersionPattern::filename("c++", ".tgz").unwrap();
        assert!(pattern.resolve("c++-1.0.0.tgz").is_some());
        assert!(pattern.resolve("cc-1.0.0.tgz").is_none());
    }

    #[test]
    fn test_version_path_validation() {
        assert!(VersionPath::new(Vec::<String>::new()).is_err());
        assert!(VersionPath::new(["2", ""]).is_err());
        assert!(VersionPath::new(["2", ".."]).is_err());
        assert!(VersionPath::new(["2/6"]).is_err());
        assert!(VersionPath::new(["2", "6", "3"]).is_ok());
    }

    #[test]
    fn test_ancestors_deepest_first() {
        let path = VersionPath::new(["2", "6", "3"]).unwrap();
        let ancestors: Vec<PathBuf> = path.ancestors().collect();
        assert_eq!(
            ancestors,
            [
                Path::new("2/6/3").to_path_buf(),
                Path::new("2/6").to_path_buf(),
                Path::new("2").to_path_buf(),
                PathBuf::new(),
            ]
        );
        assert_eq!(path.to_path(), Path::new("2/6/3"));
        assert_eq!(path.to_string(), "2/6/3");
    }
}
