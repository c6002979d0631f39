//! HTTP-based page fetcher using reqwest.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::fetcher::PageFetcher;
use crate::provider::ProviderConfig;
use crate::{RadarError, Result};

/// A page fetcher that issues plain GET requests via reqwest.
///
/// Non-success status codes are turned into errors, so callers see a
/// single failure path for transport and HTTP-level problems.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher carrying the provider's timeout and custom headers.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for header in &config.custom_headers {
            let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(|e| {
                RadarError::Config(format!("invalid header name '{}': {}", header.name, e))
            })?;
            let value = HeaderValue::from_str(&header.value).map_err(|e| {
                RadarError::Config(format!("invalid value for header '{}': {}", header.name, e))
            })?;
            headers.append(name, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        Ok(body)
    }
}
