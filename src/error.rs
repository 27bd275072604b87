// src/error.rs
// =============================================================================
// Error types for the mirroring engine.
//
// Two families:
// - MirrorError: problems that stop the whole run (bad URL, the page itself
//   could not be fetched, the bundle could not be created on disk)
// - FetchError: problems with a single download; for resources these are
//   recorded in the report and the run carries on
//
// The binary wraps everything in anyhow at the top level (see main.rs).
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a mirroring run.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The page URL could not be parsed as an absolute URL
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The page URL parsed but has no host to name the bundle after
    #[error("URL has no host: {0}")]
    MissingHost(String),

    /// The page itself could not be downloaded
    #[error("failed to fetch page {url}")]
    PageFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to create resource directory {}", .path.display())]
    CreateResourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write page file {}", .path.display())]
    WritePage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a single `fetch(url)` call.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS, timeout, unsupported scheme...
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with something other than 2xx
    #[error("HTTP {0}")]
    Status(u16),

    /// The response started but the body could not be read
    #[error("failed to read body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            FetchError::Status(status.as_u16())
        } else if error.is_body() || error.is_decode() {
            FetchError::Body(error.to_string())
        } else {
            FetchError::Request(error.to_string())
        }
    }
}
