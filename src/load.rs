// src/load.rs

//! Input acquisition
//!
//! A config locator is either an `http://`/`https://` URL or a local path.
//! Remote fetches are a single attempt; there is no retry.

use crate::error::{Error, Result};
use crate::sense::FormatOrigin;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default timeout for fetching remote configs (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a locator names a remote config
pub fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Read the raw bytes behind a locator, tagging where they came from
pub fn load_config(locator: &str) -> Result<(Vec<u8>, FormatOrigin)> {
    if is_remote(locator) {
        fetch_remote(locator).map(|bytes| (bytes, FormatOrigin::Remote))
    } else {
        read_local(locator).map(|bytes| (bytes, FormatOrigin::Local))
    }
}

fn acquisition_error(locator: &str, reason: impl ToString) -> Error {
    Error::InputAcquisition {
        locator: locator.to_string(),
        reason: reason.to_string(),
    }
}

fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    debug!("Fetching remote config from {}", url);

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| acquisition_error(url, format!("Failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| acquisition_error(url, e))?;

    if !response.status().is_success() {
        return Err(acquisition_error(url, format!("HTTP {}", response.status())));
    }

    let body = response
        .bytes()
        .map_err(|e| acquisition_error(url, format!("Failed to read response: {e}")))?;

    Ok(body.to_vec())
}

fn read_local(path: &str) -> Result<Vec<u8>> {
    let path = Path::new(path);
    let absolute = std::path::absolute(path)
        .map_err(|e| acquisition_error(&path.display().to_string(), e))?;
    debug!("Reading local config from {}", absolute.display());

    std::fs::read(&absolute).map_err(|e| acquisition_error(&absolute.display().to_string(), e))
}
