// src/fetch/testing.rs
// =============================================================================
// In-memory `Fetch` for tests: canned bodies and status codes keyed by URL.
//
// URLs are matched on their full serialized form, query included. Anything
// not registered fails like an unreachable host.
// =============================================================================

use std::collections::HashMap;
use url::Url;

use super::http::Fetch;
use crate::error::FetchError;

#[derive(Debug, Clone)]
enum Response {
    Body(Vec<u8>),
    Status(u16),
}

/// Fake fetcher built with `with_body` / `with_status`
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Response>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), Response::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Response::Status(status));
        self
    }
}

// no await inside; the async fn only satisfies the trait signature
impl Fetch for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        match self.responses.get(url.as_str()) {
            Some(Response::Body(body)) => Ok(body.clone()),
            Some(Response::Status(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Request(format!("connection refused: {}", url))),
        }
    }
}
