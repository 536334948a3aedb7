// src/repository/client.rs

//! HTTP client for repository operations
//!
//! Provides a wrapper around reqwest with retry support for fetching
//! manifests and downloading snapshots and installers.

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// HTTP client wrapper with retry support
pub struct RepositoryClient {
    client: Client,
    max_retries: u32,
}

impl RepositoryClient {
    /// Create a new repository client
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("wingetpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::DownloadError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
        })
    }

    /// Send a GET request, retrying transport failures
    ///
    /// HTTP error statuses are returned as-is; only connection-level failures
    /// are retried.
    fn get_with_retry(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(url).send() {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::DownloadError(format!(
                            "Failed to fetch {url} after {attempt} attempts: {e}"
                        )));
                    }
                    warn!("Request attempt {} for {} failed: {}, retrying...", attempt, url, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }
    }

    /// Fetch a URL as text
    ///
    /// A 404 becomes [`Error::NotFoundError`] so callers can tell a missing
    /// document from a network failure.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self.get_with_retry(url)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFoundError(format!("{url} returned 404")));
        }
        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .map_err(|e| Error::DownloadError(format!("Failed to read response from {url}: {e}")))
    }

    /// Download a file to the specified path with retry support
    pub fn download_file(&self, url: &str, dest_path: &Path) -> Result<()> {
        info!("Downloading {} to {}", url, dest_path.display());

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::IoError(format!("Failed to create directory {}: {e}", parent.display()))
            })?;
        }

        let mut response = self.get_with_retry(url)?;
        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        // Write to temporary file first
        let temp_path = dest_path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(|e| {
            Error::IoError(format!("Failed to create file {}: {e}", temp_path.display()))
        })?;

        let written = io::copy(&mut response, &mut file).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Error::DownloadError(format!("Failed to write downloaded data: {e}"))
        })?;
        drop(file);

        // Atomic rename from temp to final destination
        fs::rename(&temp_path, dest_path).map_err(|e| {
            Error::IoError(format!(
                "Failed to move {} to {}: {e}",
                temp_path.display(),
                dest_path.display()
            ))
        })?;

        info!("Downloaded {} bytes to {}", written, dest_path.display());
        Ok(())
    }
}
