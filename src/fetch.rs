//! Page fetching.
//!
//! [`PageFetcher`] is the seam between the crawl pipeline and the network.
//! [`HttpFetcher`] is the real implementation; tests substitute an in-memory
//! page map.
//!
//! A fetch yields the body only for HTTP 200. Any other status, and any
//! transport error, drops the URL: the caller sees `None` and moves on.
//! There are no retries.

use reqwest::{Client, StatusCode, header};
use tracing::{debug, instrument, warn};

/// Fetches page bodies by URL.
pub trait PageFetcher {
    /// Return the body of `url`, or `None` if it was not a 200 response.
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client that sends a fixed
/// `User-Agent` on every request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    async fn get_text(&self, url: &str) -> Result<Option<String>, reqwest::Error> {
        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK {
            warn!(%url, %status, "Non-200 response; dropping URL");
            return Ok(None);
        }
        Ok(Some(resp.text().await?))
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Option<String> {
        match self.get_text(url).await {
            Ok(Some(body)) => {
                debug!(bytes = body.len(), "Fetched page");
                Some(body)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(%url, error = %e, "Fetch failed; dropping URL");
                None
            }
        }
    }
}
