//! Bing search provider.

use std::sync::Arc;

use async_trait::async_trait;

use crate::fetcher::PageFetcher;
use crate::provider::{CustomHeader, PagedProvider, ProviderConfig};
use crate::{Provider, Result};

/// Bing search provider.
pub struct Bing {
    inner: PagedProvider,
}

/// Bing's `first` parameter is 1-based: the page after ten results starts at 11.
fn page_offset(start: usize) -> usize {
    if start > 0 {
        start + 1
    } else {
        start
    }
}

impl Bing {
    pub const NAME: &'static str = "Bing";

    /// Returns the built-in configuration.
    pub fn default_config() -> ProviderConfig {
        ProviderConfig {
            base_address: "https://www.bing.com/".to_string(),
            query_template: "search?q={keyword}".to_string(),
            page_template: "first={start}".to_string(),
            extraction_pattern: r#"<h2[^>]*><a[^>]*href="(https?://[^"]+)""#.to_string(),
            page_size: 10,
            request_timeout_ms: 10_000,
            extraction_timeout_ms: 2_000,
            inter_request_delay_ms: 1_000,
            custom_headers: vec![
                CustomHeader::new(
                    "User-Agent",
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
                ),
                CustomHeader::new("Accept-Language", "en-US,en;q=0.5"),
            ],
        }
    }

    /// Creates a Bing provider fetching over HTTP.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            inner: PagedProvider::with_http(Self::NAME, config)?.with_page_offset(page_offset),
        })
    }

    /// Creates a Bing provider with a custom page fetcher.
    pub fn with_fetcher(config: ProviderConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Ok(Self {
            inner: PagedProvider::new(Self::NAME, config, fetcher)?.with_page_offset(page_offset),
        })
    }

    /// Returns the underlying paginated provider.
    pub fn provider(&self) -> &PagedProvider {
        &self.inner
    }
}

#[async_trait]
impl Provider for Bing {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn query(&self, keyword: &str, take: usize) -> Result<Vec<String>> {
        self.inner.query(keyword, take).await
    }
}
