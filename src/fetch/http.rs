// src/fetch/http.rs
// =============================================================================
// The fetch capability: "give me the bytes behind this URL".
//
// The mirroring engine only talks to the `Fetch` trait, so tests can swap in
// an in-memory implementation. `HttpFetcher` is the real one, built on a
// single reqwest Client (connection pooling is shared by all downloads).
//
// No custom headers, no cookies, no retries. Redirects and TLS follow
// reqwest's defaults.
// =============================================================================

use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::error::FetchError;

/// Something that can download a URL.
pub trait Fetch {
    /// Returns the body of a 2xx response, or why there isn't one.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// `Fetch` over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `timeout` applies per request; `None` keeps reqwest's default (no timeout)
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;
        Ok(body.to_vec())
    }
}
