//! HTTP adapter (page fetching for the link scanner).
//!
//! Implements the `tgscan-core` `PageFetcher` port over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;

use tgscan_core::{errors::Error, ports::PageFetcher, Result};

#[derive(Clone, Debug)]
pub struct HttpPageFetcher {
    http: reqwest::Client,
}

impl HttpPageFetcher {
    /// Every request is bounded by `timeout`; expiry surfaces as a fetch error.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tgscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::External(format!("http client build error: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::fetch(url, "request timed out")
            } else {
                Error::fetch(url, e)
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url, %status, "page fetch returned non-success status");
            return Err(Error::fetch(url, format!("HTTP {status}")));
        }

        resp.text().await.map_err(|e| Error::fetch(url, e))
    }
}
