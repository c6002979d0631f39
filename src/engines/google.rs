//! Google search provider.
//!
//! Reads the basic HTML result page, where every organic result links
//! through a `/url?q=<target>&amp;...` redirect.

use std::sync::Arc;

use async_trait::async_trait;

use crate::fetcher::PageFetcher;
use crate::provider::{CustomHeader, PagedProvider, ProviderConfig};
use crate::{Provider, Result};

/// Google search provider.
///
/// Google's `start` parameter is zero-based, so page offsets are used as is.
pub struct Google {
    inner: PagedProvider,
}

impl Google {
    pub const NAME: &'static str = "Google";

    /// Returns the built-in configuration.
    pub fn default_config() -> ProviderConfig {
        ProviderConfig {
            base_address: "https://www.google.com/".to_string(),
            query_template: "search?num=10&hl=en&q={keyword}".to_string(),
            page_template: "start={start}".to_string(),
            extraction_pattern: r#"<a href="/url\?q=(https?://[^&"]+)&amp;"#.to_string(),
            page_size: 10,
            request_timeout_ms: 10_000,
            extraction_timeout_ms: 2_000,
            inter_request_delay_ms: 1_500,
            custom_headers: vec![
                CustomHeader::new("User-Agent", "Lynx/2.9.0 libwww-FM/2.14 SSL-MM/1.4.1"),
                CustomHeader::new("Accept-Language", "en-US,en;q=0.5"),
            ],
        }
    }

    /// Creates a Google provider fetching over HTTP.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            inner: PagedProvider::with_http(Self::NAME, config)?
                .with_url_rewrite(decode_redirect_target),
        })
    }

    /// Creates a Google provider with a custom page fetcher.
    pub fn with_fetcher(config: ProviderConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Ok(Self {
            inner: PagedProvider::new(Self::NAME, config, fetcher)?
                .with_url_rewrite(decode_redirect_target),
        })
    }

    /// Returns the underlying paginated provider.
    pub fn provider(&self) -> &PagedProvider {
        &self.inner
    }
}

/// The `q` parameter of a redirect link is percent-encoded. Targets that
/// do not decode to UTF-8 are kept as captured.
fn decode_redirect_target(raw: String) -> String {
    let decoded = urlencoding::decode(&raw).map(|target| target.into_owned());
    decoded.unwrap_or(raw)
}

#[async_trait]
impl Provider for Google {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn query(&self, keyword: &str, take: usize) -> Result<Vec<String>> {
        self.inner.query(keyword, take).await
    }
}
