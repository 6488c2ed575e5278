//! HTTP client for the remote calendar feed.

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::FeedConfig;
use crate::error::{ImportError, ImportResult};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches the raw text of one calendar feed.
///
/// Holds a pooled `reqwest::Client`; clones are cheap and share connections.
#[derive(Clone)]
pub struct FeedClient {
    http: Client,
    url: Url,
}

impl FeedClient {
    pub fn new(config: &FeedConfig) -> ImportResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ImportError::Config(format!("could not build HTTP client: {e}")))?;

        Ok(FeedClient {
            http,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// GET the feed once. Any non-2xx status is an error.
    pub async fn fetch(&self) -> ImportResult<String> {
        debug!(url = %self.url, "fetching calendar feed");

        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(ImportError::fetch)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Status {
                status,
                url: self.url.to_string(),
            });
        }

        let body = response.text().await.map_err(ImportError::fetch)?;
        debug!(bytes = body.len(), "calendar feed received");

        Ok(body)
    }
}
