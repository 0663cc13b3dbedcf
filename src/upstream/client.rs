// src/upstream/client.rs

//! HTTP client for upstream release listings
//!
//! Provides a wrapper around reqwest with retry support for fetching JSON
//! API pages and plain-text checksum manifests.

use crate::error::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum retry attempts for failed requests
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// Some APIs (GitHub among them) reject requests without a user agent
const CLIENT_USER_AGENT: &str = concat!("vertree/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper with retry support
pub struct UpstreamClient {
    client: Client,
    max_retries: u32,
    token: Option<String>,
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            token: None,
        })
    }

    /// Send a bearer token with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let builder = self.client.get(url).header(USER_AGENT, CLIENT_USER_AGENT);
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("token {token}")),
            None => builder,
        }
    }

    /// Send a GET request, retrying transport failures
    ///
    /// HTTP error statuses are not retried: a 404 or 403 will not go away.
    fn get_with_retry(&self, url: &str, accept: &str) -> Result<Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.request(url).header(ACCEPT, accept).send() {
                Ok(response) => {
                    if !response.status().is_success() {
                        return Err(Error::DownloadError(format!(
                            "HTTP {} from {}",
                            response.status(),
                            url
                        )));
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::DownloadError(format!(
                            "Failed to fetch {url} after {attempt} attempts: {e}"
                        )));
                    }
                    warn!("Fetch attempt {} for {} failed: {}, retrying...", attempt, url, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }
    }

    /// Fetch and deserialize a JSON document
    pub fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Fetching JSON from {}", url);
        let response = self.get_with_retry(url, "application/json")?;
        response
            .json()
            .map_err(|e| Error::ParseError(format!("Failed to parse JSON from {url}: {e}")))
    }

    /// Fetch a document as UTF-8 text
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        info!("Fetching {}", url);
        let response = self.get_with_retry(url, "text/plain")?;
        response
            .text()
            .map_err(|e| Error::DownloadError(format!("Failed to read response from {url}: {e}")))
    }
}
