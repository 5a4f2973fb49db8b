//! Playlist retrieval over HTTP
//!
//! One GET per call, no retries and no caching. Exactly status 200 counts as
//! success; every other status is reported the same way as a transport
//! failure would be, only with the code attached for logging.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::errors::{AppError, AppResult, FetchError, FetchResult};
use crate::models::SourceUrl;
use crate::utils::UrlUtils;

/// Anything that can turn a source URL into raw playlist text
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch(&self, url: &SourceUrl) -> FetchResult<String>;
}

/// reqwest-backed fetcher with a request timeout applied to every call
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetcher with only the request timeout changed from the defaults
    pub fn with_timeout(timeout: Duration) -> AppResult<Self> {
        Self::new(&FetchConfig {
            timeout,
            ..FetchConfig::default()
        })
    }
}

#[async_trait]
impl PlaylistFetcher for HttpFetcher {
    async fn fetch(&self, url: &SourceUrl) -> FetchResult<String> {
        let display_url = UrlUtils::obfuscate_credentials(url.as_str());
        debug!("Fetching playlist from {}", display_url);

        let response = self.client.get(url.as_str()).send().await.map_err(|e| {
            warn!("Request to {} failed: {}", display_url, e);
            FetchError::unreachable(url.as_str(), UrlUtils::obfuscate_credentials(&e.to_string()))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Playlist source {} answered with {}", display_url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read playlist body from {}: {}", display_url, e);
            FetchError::unreachable(url.as_str(), format!("Failed to read response: {e}"))
        })?;

        debug!("Fetched {} bytes from {}", body.len(), display_url);
        Ok(body)
    }
}
