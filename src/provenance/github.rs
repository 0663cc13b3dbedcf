// src/provenance/github.rs

//! GitHub tags as a provenance source
//!
//! Lists every tag of a repository through the REST API. GitHub does not
//! publish archive hashes, so each release comes back as an
//! [`ContentDescriptor::UnhashedRef`] and the tarball is hashed locally.

use super::{ContentDescriptor, ProvenanceSource, Snapshot, UpstreamRelease};
use crate::error::Result;
use crate::upstream::UpstreamClient;
use crate::version::VersionPattern;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default GitHub REST API endpoint
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Tags requested per page (GitHub's maximum)
const PAGE_SIZE: usize = 100;

/// One entry of the `/repos/{owner}/{repo}/tags` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitTag {
    pub name: String,
    pub tarball_url: String,
    #[serde(default)]
    pub commit: Option<TagCommit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCommit {
    pub sha: String,
}

/// Releases of a GitHub repository, identified by `v2_6_3` style tags
pub struct GithubTags {
    owner: String,
    repo: String,
    api_base: String,
    token: Option<String>,
    snapshot: Option<Snapshot>,
    pattern: VersionPattern,
}

impl GithubTags {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            api_base: DEFAULT_GITHUB_API.to_string(),
            token: None,
            snapshot: None,
            pattern: VersionPattern::tag(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_snapshot(mut self, snapshot: Option<Snapshot>) -> Self {
        self.snapshot = snapshot;
        self
    }

    fn tags_url(&self, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/tags?per_page={}&page={}",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            PAGE_SIZE,
            page
        )
    }

    /// Fetch every page of the tag listing
    fn fetch_tags(&self) -> Result<Vec<GitTag>> {
        let client = UpstreamClient::new()?.with_token(self.token.clone());
        let mut tags = Vec::new();

        for page in 1.. {
            let batch: Vec<GitTag> = client.fetch_json(&self.tags_url(page))?;
            let done = batch.len() < PAGE_SIZE;
            debug!("Tag page {} returned {} tags", page, batch.len());
            tags.extend(batch);
            if done {
                break;
            }
        }

        info!("Fetched {} tags for {}/{}", tags.len(), self.owner, self.repo);
        Ok(tags)
    }

    /// Pair each tag with the descriptor for its tarball
    pub fn releases_from_tags(&self, tags: Vec<GitTag>) -> Vec<UpstreamRelease> {
        tags.into_iter()
            .map(|tag| UpstreamRelease {
                descriptor: ContentDescriptor::UnhashedRef {
                    owner: self.owner.clone(),
                    repo: self.repo.clone(),
                    rev: tag.name.clone(),
                    tarball_url: tag.tarball_url,
                },
                identifier: tag.name,
            })
            .collect()
    }
}

impl ProvenanceSource for GithubTags {
    fn name(&self) -> String {
        format!("github:{}/{}", self.owner, self.repo)
    }

    fn pattern(&self) -> &VersionPattern {
        &self.pattern
    }

    fn fetch_releases(&self) -> Result<Vec<UpstreamRelease>> {
        let tags = super::snapshot::fetch_cached(self.snapshot.as_ref(), || self.fetch_tags())?;
        Ok(self.releases_from_tags(tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TAGS_JSON: &str = r#"[
        {
            "name": "v2_6_3",
            "zipball_url": "https://api.github.com/repos/ruby/ruby/zipball/v2_6_3",
            "tarball_url": "https://api.github.com/repos/ruby/ruby/tarball/v2_6_3",
            "commit": { "sha": "f1a2b3", "url": "https://api.github.com/repos/ruby/ruby/commits/f1a2b3" },
            "node_id": "MDM6UmVmcmVmcy90YWdzL3YyXzZfMw=="
        },
        {
            "name": "nightly",
            "tarball_url": "https://api.github.com/repos/ruby/ruby/tarball/nightly"
        }
    ]"#;

    #[test]
    fn test_parse_tag_listing() {
        let tags: Vec<GitTag> = serde_json::from_str(TAGS_JSON).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "v2_6_3");
        assert_eq!(tags[0].commit.as_ref().map(|c| c.sha.as_str()), Some("f1a2b3"));
        assert!(tags[1].commit.is_none());
    }

    #[test]
    fn test_releases_from_tags() {
        let source = GithubTags::new("ruby", "ruby");
        let tags: Vec<GitTag> = serde_json::from_str(TAGS_JSON).unwrap();
        let releases = source.releases_from_tags(tags);

        assert_eq!(releases[0].identifier, "v2_6_3");
        assert_eq!(
            releases[0].descriptor,
            ContentDescriptor::UnhashedRef {
                owner: "ruby".into(),
                repo: "ruby".into(),
                rev: "v2_6_3".into(),
                tarball_url: "https://api.github.com/repos/ruby/ruby/tarball/v2_6_3".into(),
            }
        );
        assert!(source.pattern().resolve(&releases[1].identifier).is_none());
    }

    #[test]
    fn test_tags_url() {
        let source = GithubTags::new("ruby", "ruby").with_api_base("https://ghe.example.org/api/v3/");
        assert_eq!(
            source.tags_url(2),
            "https://ghe.example.org/api/v3/repos/ruby/ruby/tags?per_page=100&page=2"
        );
    }

    #[test]
    fn test_fetch_uses_snapshot() {
        let temp = TempDir::new().unwrap();
        let snapshot = Snapshot::new(temp.path().join("tags.json"));
        std::fs::write(snapshot.path(), TAGS_JSON).unwrap();

        // Unroutable API base: any network access would fail the test
        let source = GithubTags::new("ruby", "ruby")
            .with_api_base("http://127.0.0.1:9")
            .with_snapshot(Some(snapshot));
        let releases = source.fetch_releases().unwrap();
        assert_eq!(releases.len(), 2);
        assert_eq!(source.name(), "github:ruby/ruby");
    }
}
